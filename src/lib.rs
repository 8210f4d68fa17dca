//! GridLedger: an append-only energy and compute metering ledger in Rust
//!
//! This crate converts metered energy and compute events into fungible
//! balances on a hash-chained ledger, featuring:
//! - Proof-of-work block sealing with cooperative cancellation
//! - Adaptive difficulty from observed seal times
//! - A halving reward schedule scaled by a resource bonus
//!   (energy source, efficiency, workload)
//! - Energy tokenization, compute allocation, and carbon credit records
//! - ECDSA record signatures (secp256k1)
//! - A bounded pending pool with overflow rejection
//! - Derived balances with TTL-bounded result caching
//! - Reverse address indexing for O(k) history lookups
//!
//! # Example
//!
//! ```rust
//! use gridledger::core::{EnergySource, Ledger, LedgerConfig, ResourceHints};
//!
//! // A ledger with an easy proof-of-work target
//! let mut ledger = Ledger::with_config(LedgerConfig {
//!     initial_difficulty: 1,
//!     ..LedgerConfig::default()
//! });
//!
//! // Convert a metered energy reading into pending tokens
//! let credited = ledger
//!     .tokenize_energy("provider-1", 100.0, EnergySource::Renewable)
//!     .unwrap();
//! assert_eq!(credited, 1500.0);
//!
//! // Seal the pending records into a block
//! let block = ledger.mine("miner-1", &ResourceHints::default()).unwrap();
//! println!("Sealed block {} with digest {}", block.index, block.hash);
//!
//! assert_eq!(ledger.balance_of("provider-1"), 1500.0);
//! assert!(ledger.is_valid());
//! ```

pub mod core;
pub mod crypto;
pub mod mining;
pub mod storage;

// Re-export commonly used types
pub use crate::core::{
    Block, BonusPolicy, EnergySource, Ledger, LedgerConfig, LedgerError, LedgerStats,
    ResourceHints, ResourceUsage, SealStats, Transaction, TxKind, WorkloadType,
};
pub use crate::crypto::KeyPair;
pub use crate::mining::{CancelToken, Mempool, Miner};
pub use crate::storage::{AddressIndex, CacheStats, IndexStats, ResultCache, TxLocation};
