//! Pending-record pool
//!
//! Holds records awaiting inclusion in the next sealed block, in arrival
//! order. The pool is bounded: once the configured capacity is reached,
//! further submissions are rejected rather than evicting older entries.

use crate::core::ledger::LedgerError;
use crate::core::transaction::Transaction;
use std::collections::HashSet;

/// Bounded FIFO pool of records awaiting sealing
#[derive(Debug, Clone)]
pub struct Mempool {
    pending: Vec<Transaction>,
    max_size: usize,
}

impl Mempool {
    /// Create a pool with the given capacity
    pub fn new(max_size: usize) -> Self {
        Self {
            pending: Vec::new(),
            max_size,
        }
    }

    /// Append a record, rejecting on overflow
    pub fn try_push(&mut self, tx: Transaction) -> Result<(), LedgerError> {
        if self.is_full() {
            return Err(LedgerError::PoolFull {
                capacity: self.max_size,
            });
        }
        self.pending.push(tx);
        Ok(())
    }

    /// The pending records in arrival order
    pub fn transactions(&self) -> &[Transaction] {
        &self.pending
    }

    /// Remove and return every pending record
    pub fn drain(&mut self) -> Vec<Transaction> {
        std::mem::take(&mut self.pending)
    }

    /// Drop pending records that match any of the given sealed records
    pub fn remove_matching(&mut self, sealed: &[Transaction]) {
        let digests: HashSet<String> = sealed.iter().map(|tx| tx.digest_hex()).collect();
        self.pending.retain(|tx| !digests.contains(&tx.digest_hex()));
    }

    /// Total metered energy across pending energy-trade records
    pub fn pending_energy_kwh(&self) -> f64 {
        self.pending.iter().filter_map(|tx| tx.energy_kwh()).sum()
    }

    /// Total compute units across pending allocation records
    pub fn pending_compute_units(&self) -> f64 {
        self.pending.iter().filter_map(|tx| tx.compute_units()).sum()
    }

    /// Number of pending records
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if the pool is empty
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Check if the pool is at capacity
    pub fn is_full(&self) -> bool {
        self.pending.len() >= self.max_size
    }

    /// Configured maximum number of pending records
    pub fn capacity(&self) -> usize {
        self.max_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transaction::EnergySource;

    fn credit(n: usize) -> Transaction {
        Transaction::reward(&format!("miner-{n}"), 1.0)
    }

    #[test]
    fn test_capacity_rejects_overflow() {
        let mut pool = Mempool::new(3);
        for n in 0..3 {
            pool.try_push(credit(n)).unwrap();
        }
        assert!(pool.is_full());

        let err = pool.try_push(credit(3)).unwrap_err();
        assert!(matches!(err, LedgerError::PoolFull { capacity: 3 }));
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_arrival_order_preserved() {
        let mut pool = Mempool::new(10);
        pool.try_push(credit(0)).unwrap();
        pool.try_push(credit(1)).unwrap();
        pool.try_push(credit(2)).unwrap();

        let recipients: Vec<_> = pool
            .transactions()
            .iter()
            .map(|tx| tx.recipient.clone())
            .collect();
        assert_eq!(recipients, vec!["miner-0", "miner-1", "miner-2"]);
    }

    #[test]
    fn test_drain_empties_pool() {
        let mut pool = Mempool::new(10);
        pool.try_push(credit(0)).unwrap();
        pool.try_push(credit(1)).unwrap();

        let drained = pool.drain();
        assert_eq!(drained.len(), 2);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_remove_matching() {
        let mut pool = Mempool::new(10);
        let keep = credit(0);
        let sealed = credit(1);
        pool.try_push(keep.clone()).unwrap();
        pool.try_push(sealed.clone()).unwrap();

        pool.remove_matching(&[sealed]);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.transactions()[0].recipient, keep.recipient);
    }

    #[test]
    fn test_pending_resource_totals() {
        let mut pool = Mempool::new(10);
        pool.try_push(Transaction::energy_trade(
            "provider-1",
            150.0,
            15.0,
            EnergySource::Renewable,
        ))
        .unwrap();
        pool.try_push(Transaction::energy_trade(
            "provider-2",
            50.0,
            5.0,
            EnergySource::Mixed,
        ))
        .unwrap();
        pool.try_push(credit(0)).unwrap();

        assert_eq!(pool.pending_energy_kwh(), 20.0);
        assert_eq!(pool.pending_compute_units(), 0.0);
    }
}
