//! Mining module: the pending pool and the proof-of-work seal

pub mod mempool;
pub mod miner;

pub use mempool::Mempool;
pub use miner::{seal, CancelToken, Miner, CANCEL_CHECK_INTERVAL, ENERGY_PER_HASH_KWH};
