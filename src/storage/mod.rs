//! Query-performance layer: result caching and address indexing

pub mod cache;
pub mod index;

pub use cache::{CacheStats, ResultCache};
pub use index::{AddressIndex, IndexStats, TxLocation};
