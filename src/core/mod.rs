//! Core ledger components
//!
//! This module contains the fundamental building blocks:
//! - Transaction records (tagged kinds for transfers and resource events)
//! - Blocks (resource-usage summaries sealed by proof of work)
//! - The ledger (chain and pool orchestration, balances, history)
//! - Difficulty control (sliding window over observed seal times)
//! - The reward schedule (halving with a floor)
//! - Input validation and configuration

pub mod block;
pub mod config;
pub mod difficulty;
pub mod ledger;
pub mod reward;
pub mod transaction;
pub mod validation;

pub use block::{Block, ResourceUsage, SealStats, GENESIS_PREVIOUS_HASH};
pub use config::{
    BonusPolicy, LedgerConfig, BASE_REWARD, DEFAULT_DIFFICULTY, DIFFICULTY_ADJUSTMENT_INTERVAL,
    ENERGY_TOKEN_RATE, HALVING_INTERVAL, MAX_DIFFICULTY, MAX_PENDING, MIN_DIFFICULTY,
};
pub use difficulty::DifficultyController;
pub use ledger::{Ledger, LedgerError, LedgerStats, ResourceHints};
pub use reward::block_reward;
pub use transaction::{EnergySource, Transaction, TxKind, WorkloadType};
pub use validation::ValidationError;
