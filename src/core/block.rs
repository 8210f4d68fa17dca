//! Block implementation for the ledger
//!
//! A block carries the batch of records sealed together, the resource-usage
//! summary of the work that produced it, and the proof-of-work digest
//! linking it to its predecessor.

use crate::core::config::BonusPolicy;
use crate::core::transaction::{EnergySource, Transaction, WorkloadType};
use crate::crypto::{meets_difficulty, sha256_hex};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Previous-digest sentinel for the genesis block
pub const GENESIS_PREVIOUS_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Resource-usage summary for a sealed block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceUsage {
    /// Energy metered into this block (kWh)
    pub energy_kwh: f64,
    /// Compute capacity metered into this block (normalized units)
    pub compute_units: f64,
    /// Carbon footprint attributed to this block (kg CO2)
    pub carbon_kg: f64,
    /// Dominant energy source backing the block
    pub source: EnergySource,
    /// Efficiency score, 0 to 100
    pub efficiency: f64,
    /// Workload the metered compute served
    pub workload: WorkloadType,
    /// Opaque compute-attestation token supplied by the miner
    pub attestation: String,
}

impl ResourceUsage {
    /// The fixed genesis summary: no metered resources, maximal trust values
    pub fn genesis() -> Self {
        Self {
            energy_kwh: 0.0,
            compute_units: 0.0,
            carbon_kg: 0.0,
            source: EnergySource::Renewable,
            efficiency: 100.0,
            workload: WorkloadType::Genesis,
            attestation: "genesis".to_string(),
        }
    }
}

/// Performance metrics recorded by the proof-of-work search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SealStats {
    /// Number of nonces tried
    pub attempts: u64,
    /// Wall-clock time of the search in milliseconds
    pub elapsed_ms: u64,
    /// Derived hash rate (attempts per second)
    pub hash_rate: f64,
    /// Estimated energy spent on the search (kWh)
    pub energy_estimate_kwh: f64,
}

/// A block in the ledger chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Chain position
    pub index: u64,
    /// Block creation time
    pub timestamp: DateTime<Utc>,
    /// Records sealed in this block
    pub transactions: Vec<Transaction>,
    /// Digest of the predecessor block
    pub previous_hash: String,
    /// Own digest (cached; recomputable from the other fields)
    pub hash: String,
    /// Proof-of-work counter
    pub nonce: u64,
    /// Resource-usage summary
    pub usage: ResourceUsage,
    /// Reward multiplier derived from the usage summary at construction
    pub reward_multiplier: f64,
    /// Metrics of the seal that produced the digest, absent until sealed
    pub seal_stats: Option<SealStats>,
}

impl Block {
    /// Create a new unsealed block (nonce zero)
    pub fn new(
        index: u64,
        previous_hash: String,
        transactions: Vec<Transaction>,
        usage: ResourceUsage,
        bonus: &BonusPolicy,
    ) -> Self {
        let reward_multiplier = bonus.multiplier(usage.source, usage.efficiency, usage.workload);
        let mut block = Self {
            index,
            timestamp: Utc::now(),
            transactions,
            previous_hash,
            hash: String::new(),
            nonce: 0,
            usage,
            reward_multiplier,
            seal_stats: None,
        };
        block.hash = block.compute_hash();
        block
    }

    /// Create the genesis block. It anchors the chain and is not
    /// proof-of-work sealed; validation starts at its successor.
    pub fn genesis(bonus: &BonusPolicy) -> Self {
        Self::new(
            0,
            GENESIS_PREVIOUS_HASH.to_string(),
            Vec::new(),
            ResourceUsage::genesis(),
            bonus,
        )
    }

    /// Recompute the block digest from its contents.
    ///
    /// Covers the previous digest, timestamp, the canonical serialization of
    /// the record sequence and usage summary, and the nonce. Seal metrics and
    /// the cached digest itself are excluded.
    pub fn compute_hash(&self) -> String {
        let transactions = serde_json::to_string(&self.transactions).unwrap_or_default();
        let usage = serde_json::to_string(&self.usage).unwrap_or_default();
        let data = format!(
            "{}{}{}{}{}",
            self.previous_hash,
            self.timestamp.timestamp_millis(),
            transactions,
            usage,
            self.nonce
        );
        sha256_hex(data.as_bytes())
    }

    /// Check the digest has the required leading-zero prefix
    pub fn meets_difficulty(&self, difficulty: u32) -> bool {
        meets_difficulty(&self.hash, difficulty)
    }

    /// Check the cached digest matches the recomputed one
    pub fn verify_hash(&self) -> bool {
        self.hash == self.compute_hash()
    }

    /// Number of records in this block
    pub fn tx_count(&self) -> usize {
        self.transactions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::BonusPolicy;

    #[test]
    fn test_genesis_block() {
        let genesis = Block::genesis(&BonusPolicy::default());
        assert_eq!(genesis.index, 0);
        assert_eq!(genesis.previous_hash, GENESIS_PREVIOUS_HASH);
        assert!(genesis.transactions.is_empty());
        assert_eq!(genesis.usage.energy_kwh, 0.0);
        assert_eq!(genesis.usage.efficiency, 100.0);
        assert!(genesis.verify_hash());
    }

    #[test]
    fn test_multiplier_fixed_at_construction() {
        let usage = ResourceUsage {
            energy_kwh: 50.0,
            compute_units: 10.0,
            carbon_kg: 0.0,
            source: EnergySource::Renewable,
            efficiency: 90.0,
            workload: WorkloadType::Inference,
            attestation: "attest-1".to_string(),
        };
        let block = Block::new(
            1,
            GENESIS_PREVIOUS_HASH.to_string(),
            Vec::new(),
            usage,
            &BonusPolicy::default(),
        );
        assert!((block.reward_multiplier - 2.34).abs() < 1e-9);
    }

    #[test]
    fn test_hash_changes_with_nonce() {
        let mut block = Block::genesis(&BonusPolicy::default());
        let original = block.compute_hash();
        block.nonce += 1;
        assert_ne!(original, block.compute_hash());
    }

    #[test]
    fn test_tampered_record_breaks_digest() {
        let reward = Transaction::reward("miner-1", 100.0);
        let mut block = Block::new(
            1,
            GENESIS_PREVIOUS_HASH.to_string(),
            vec![reward],
            ResourceUsage::genesis(),
            &BonusPolicy::default(),
        );
        assert!(block.verify_hash());

        block.transactions[0].amount = 1_000_000.0;
        assert!(!block.verify_hash());
    }

    #[test]
    fn test_seal_stats_excluded_from_digest() {
        let mut block = Block::genesis(&BonusPolicy::default());
        let before = block.compute_hash();
        block.seal_stats = Some(SealStats {
            attempts: 42,
            elapsed_ms: 7,
            hash_rate: 6000.0,
            energy_estimate_kwh: 0.0001,
        });
        assert_eq!(before, block.compute_hash());
    }
}
