//! Proof-of-work sealing
//!
//! The seal loop increments the nonce until the block digest carries the
//! required leading-zero prefix. The search is CPU-bound with no iteration
//! limit, so it polls a caller-supplied cancellation token at a fixed
//! granularity; a cancelled seal leaves no trace on the ledger.

use crate::core::block::{Block, ResourceUsage, SealStats};
use crate::core::config::BonusPolicy;
use crate::core::ledger::{Ledger, LedgerError, ResourceHints};
use crate::core::transaction::Transaction;
use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Nonces tried between cancellation checks
pub const CANCEL_CHECK_INTERVAL: u64 = 1024;

/// Estimated energy cost of a single hash attempt (kWh), used for the
/// seal metrics only
pub const ENERGY_PER_HASH_KWH: f64 = 2.5e-10;

/// Cooperative cancellation signal for an in-flight seal.
///
/// Clones share the same flag; cancelling any clone stops the search at the
/// next check.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Run the proof-of-work search on a block.
///
/// On success the block holds a digest with `difficulty` leading zero hex
/// characters and its seal metrics are populated. Returns
/// `LedgerError::Cancelled` if the token fires first; the block is then left
/// mid-search and must not be appended.
pub fn seal(
    block: &mut Block,
    difficulty: u32,
    cancel: &CancelToken,
) -> Result<SealStats, LedgerError> {
    let start = Instant::now();
    let mut nonce: u64 = 0;

    loop {
        if nonce % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
            return Err(LedgerError::Cancelled);
        }

        block.nonce = nonce;
        block.hash = block.compute_hash();
        if block.meets_difficulty(difficulty) {
            break;
        }
        nonce += 1;
    }

    let elapsed = start.elapsed();
    let attempts = nonce + 1;
    let hash_rate = if elapsed.as_secs_f64() > 0.0 {
        attempts as f64 / elapsed.as_secs_f64()
    } else {
        attempts as f64
    };

    let stats = SealStats {
        attempts,
        elapsed_ms: elapsed.as_millis() as u64,
        hash_rate,
        energy_estimate_kwh: attempts as f64 * ENERGY_PER_HASH_KWH,
    };
    block.seal_stats = Some(stats.clone());
    Ok(stats)
}

/// Convenience wrapper binding a reward address to the mining flow
pub struct Miner {
    /// Address credited with block rewards
    pub address: String,
}

impl Miner {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
        }
    }

    /// Mine the next block on the given ledger, blocking until sealed
    pub fn mine_block(
        &self,
        ledger: &mut Ledger,
        hints: &ResourceHints,
    ) -> Result<Block, LedgerError> {
        ledger.mine(&self.address, hints)
    }

    /// Mine the next block, stopping early if the token fires
    pub fn mine_block_cancellable(
        &self,
        ledger: &mut Ledger,
        hints: &ResourceHints,
        cancel: &CancelToken,
    ) -> Result<Block, LedgerError> {
        ledger.mine_cancellable(&self.address, hints, cancel)
    }

    /// Seal a block against a chain snapshot without holding the ledger.
    ///
    /// The caller snapshots the chain head, assembles the record batch, runs
    /// this CPU-bound search off to the side, and appends the result with
    /// [`Ledger::append_block`] under its own locking discipline.
    pub fn seal_detached(
        &self,
        index: u64,
        previous_hash: String,
        difficulty: u32,
        transactions: Vec<Transaction>,
        usage: ResourceUsage,
        bonus: &BonusPolicy,
        cancel: &CancelToken,
    ) -> Result<Block, LedgerError> {
        let mut block = Block::new(index, previous_hash, transactions, usage, bonus);
        info!("Sealing block {} at difficulty {}...", block.index, difficulty);

        let stats = seal(&mut block, difficulty, cancel)?;
        info!(
            "Block {} sealed in {}ms ({} attempts, {:.2} H/s)",
            block.index, stats.elapsed_ms, stats.attempts, stats.hash_rate
        );
        Ok(block)
    }
}
