//! Stateless input validation
//!
//! Pure guards that reject malformed numeric and identifier inputs before
//! they reach the ledger. Every mutating ledger operation runs the relevant
//! checks first; a failed check has no side effects. Energy-source and
//! workload membership need no runtime guard — those are closed enums.

use crate::core::config::LedgerConfig;
use crate::core::transaction::{Transaction, TxKind};
use thiserror::Error;

/// A bound violation, naming the offending field
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },
    #[error("{field} out of range: {value} (allowed {min} to {max})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{field} too short: {len} characters (minimum {min})")]
    IdentityTooShort {
        field: &'static str,
        len: usize,
        min: usize,
    },
}

/// Check that a numeric field is finite and within [min, max]
pub fn check_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field, value });
    }
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Check a token amount against the configured bounds
pub fn check_amount(config: &LedgerConfig, amount: f64) -> Result<(), ValidationError> {
    check_range("amount", amount, config.min_amount, config.max_amount)
}

/// Check a metered energy quantity against the configured bounds
pub fn check_energy(config: &LedgerConfig, energy_kwh: f64) -> Result<(), ValidationError> {
    check_range(
        "energy_kwh",
        energy_kwh,
        config.min_energy_kwh,
        config.max_energy_kwh,
    )
}

/// Check a compute quantity against the configured bounds
pub fn check_compute(config: &LedgerConfig, compute_units: f64) -> Result<(), ValidationError> {
    check_range(
        "compute_units",
        compute_units,
        config.min_compute_units,
        config.max_compute_units,
    )
}

/// Check a carbon mass against the configured bounds
pub fn check_carbon(config: &LedgerConfig, carbon_kg: f64) -> Result<(), ValidationError> {
    check_range(
        "carbon_kg",
        carbon_kg,
        config.min_carbon_kg,
        config.max_carbon_kg,
    )
}

/// Check an efficiency score is within [0, 100]
pub fn check_efficiency(efficiency: f64) -> Result<(), ValidationError> {
    check_range("efficiency", efficiency, 0.0, 100.0)
}

/// Check a participant identifier is long enough
pub fn check_identity(
    field: &'static str,
    identity: &str,
    config: &LedgerConfig,
) -> Result<(), ValidationError> {
    if identity.len() < config.min_identity_len {
        return Err(ValidationError::IdentityTooShort {
            field,
            len: identity.len(),
            min: config.min_identity_len,
        });
    }
    Ok(())
}

/// Run every bound check relevant to a record
pub fn check_transaction(config: &LedgerConfig, tx: &Transaction) -> Result<(), ValidationError> {
    if let Some(sender) = &tx.sender {
        check_identity("sender", sender, config)?;
    }
    check_identity("recipient", &tx.recipient, config)?;
    check_amount(config, tx.amount)?;

    match &tx.kind {
        TxKind::Transfer | TxKind::MiningReward => Ok(()),
        TxKind::EnergyTrade { energy_kwh, .. } => check_energy(config, *energy_kwh),
        TxKind::ComputeAllocation { compute_units, .. } => check_compute(config, *compute_units),
        TxKind::CarbonCredit { carbon_kg } => check_carbon(config, *carbon_kg),
    }
}
