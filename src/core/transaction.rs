//! Transaction records for the ledger
//!
//! A record is a signed intent to move value or account for a metered
//! resource event. Construction never fails; validity (signature checks
//! against the sender identity) is a separate, explicit step. Records
//! without a sender are system-issued credits — mining rewards and energy
//! tokenization — and are valid without a signature.

use crate::crypto::{public_key_from_hex, sha256, sha256_hex, verify_signature, KeyError, KeyPair};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where metered energy came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergySource {
    Renewable,
    Nuclear,
    Fossil,
    Mixed,
}

impl fmt::Display for EnergySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EnergySource::Renewable => "renewable",
            EnergySource::Nuclear => "nuclear",
            EnergySource::Fossil => "fossil",
            EnergySource::Mixed => "mixed",
        };
        f.write_str(name)
    }
}

/// What a compute allocation is spent on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadType {
    Training,
    Inference,
    General,
    Genesis,
}

impl fmt::Display for WorkloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkloadType::Training => "training",
            WorkloadType::Inference => "inference",
            WorkloadType::General => "general",
            WorkloadType::Genesis => "genesis",
        };
        f.write_str(name)
    }
}

/// Transaction kind, one case per event type with exactly its required fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TxKind {
    /// Plain value transfer between participants
    Transfer,
    /// Metered energy converted into tokens for the provider
    EnergyTrade { energy_kwh: f64, source: EnergySource },
    /// Compute capacity purchased from a provider
    ComputeAllocation {
        compute_units: f64,
        workload: WorkloadType,
    },
    /// Carbon credit purchase, retired against the buyer's footprint
    CarbonCredit { carbon_kg: f64 },
    /// Block reward credited to the sealing miner
    MiningReward,
}

/// A ledger transaction record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Sender identity; `None` marks a system-issued credit
    pub sender: Option<String>,
    /// Recipient identity
    pub recipient: String,
    /// Token amount moved or credited
    pub amount: f64,
    /// Event kind and its metadata
    pub kind: TxKind,
    /// Record creation time
    pub timestamp: DateTime<Utc>,
    /// Compact ECDSA signature over the record digest, hex encoded.
    /// Absent only on system-issued credits.
    pub signature: Option<String>,
}

impl Transaction {
    fn new(sender: Option<String>, recipient: &str, amount: f64, kind: TxKind) -> Self {
        Self {
            sender,
            recipient: recipient.to_string(),
            amount,
            kind,
            timestamp: Utc::now(),
            signature: None,
        }
    }

    /// Create an unsigned value transfer
    pub fn transfer(sender: &str, recipient: &str, amount: f64) -> Self {
        Self::new(Some(sender.to_string()), recipient, amount, TxKind::Transfer)
    }

    /// Create a system-issued energy tokenization credit
    pub fn energy_trade(provider: &str, amount: f64, energy_kwh: f64, source: EnergySource) -> Self {
        Self::new(
            None,
            provider,
            amount,
            TxKind::EnergyTrade { energy_kwh, source },
        )
    }

    /// Create an unsigned compute allocation purchase
    pub fn compute_allocation(
        sender: &str,
        provider: &str,
        amount: f64,
        compute_units: f64,
        workload: WorkloadType,
    ) -> Self {
        Self::new(
            Some(sender.to_string()),
            provider,
            amount,
            TxKind::ComputeAllocation {
                compute_units,
                workload,
            },
        )
    }

    /// Create an unsigned carbon credit purchase
    pub fn carbon_credit(sender: &str, registry: &str, amount: f64, carbon_kg: f64) -> Self {
        Self::new(
            Some(sender.to_string()),
            registry,
            amount,
            TxKind::CarbonCredit { carbon_kg },
        )
    }

    /// Create a system-issued mining reward
    pub fn reward(miner: &str, amount: f64) -> Self {
        Self::new(None, miner, amount, TxKind::MiningReward)
    }

    /// Whether this record was issued by the ledger itself
    pub fn is_system(&self) -> bool {
        self.sender.is_none()
    }

    /// Metered energy carried by this record, if any
    pub fn energy_kwh(&self) -> Option<f64> {
        match self.kind {
            TxKind::EnergyTrade { energy_kwh, .. } => Some(energy_kwh),
            _ => None,
        }
    }

    /// Compute units carried by this record, if any
    pub fn compute_units(&self) -> Option<f64> {
        match self.kind {
            TxKind::ComputeAllocation { compute_units, .. } => Some(compute_units),
            _ => None,
        }
    }

    /// Carbon mass carried by this record, if any
    pub fn carbon_kg(&self) -> Option<f64> {
        match self.kind {
            TxKind::CarbonCredit { carbon_kg } => Some(carbon_kg),
            _ => None,
        }
    }

    /// Canonical byte representation hashed for signing and verification.
    /// The signature itself is excluded so both sides hash identical input.
    fn canonical(&self) -> String {
        format!(
            "{:?}|{}|{}|{:?}|{}",
            self.sender,
            self.recipient,
            self.amount,
            self.kind,
            self.timestamp.timestamp_millis()
        )
    }

    /// The record's content digest as a hex string
    pub fn digest_hex(&self) -> String {
        sha256_hex(self.canonical().as_bytes())
    }

    /// The record's content digest as raw bytes
    pub fn digest(&self) -> Vec<u8> {
        sha256(self.canonical().as_bytes())
    }

    /// Sign the record with the sender's key pair
    pub fn sign(&mut self, key_pair: &KeyPair) -> Result<(), KeyError> {
        let signature = key_pair.sign(&self.digest())?;
        self.signature = Some(hex::encode(signature));
        Ok(())
    }

    /// Check record validity.
    ///
    /// System-issued credits are always valid. Any other record is valid iff
    /// its signature verifies against the sender identity over the record
    /// digest. Malformed identities or signatures count as invalid, not as
    /// errors.
    pub fn is_valid(&self) -> bool {
        let Some(sender) = &self.sender else {
            return true;
        };
        let Some(signature) = &self.signature else {
            return false;
        };
        let Ok(public_key) = public_key_from_hex(sender) else {
            return false;
        };
        let Ok(sig_bytes) = hex::decode(signature) else {
            return false;
        };
        verify_signature(&public_key, &self.digest(), &sig_bytes).unwrap_or(false)
    }
}
