//! Ledger configuration
//!
//! Every tunable the ledger consults lives here: validation bounds, pool
//! capacity, the difficulty band, the reward schedule, the resource bonus
//! multipliers, and cache geometry. `LedgerConfig::default()` gives the
//! standard values; `Ledger::with_config` accepts overrides.

use crate::core::transaction::{EnergySource, WorkloadType};
use std::time::Duration;

/// Default transaction amount bounds (tokens)
pub const MIN_TX_AMOUNT: f64 = 0.000_001;
pub const MAX_TX_AMOUNT: f64 = 1_000_000_000.0;

/// Default metered energy bounds (kWh)
pub const MIN_ENERGY_KWH: f64 = 0.001;
pub const MAX_ENERGY_KWH: f64 = 1_000_000.0;

/// Default compute allocation bounds (normalized units)
pub const MIN_COMPUTE_UNITS: f64 = 0.001;
pub const MAX_COMPUTE_UNITS: f64 = 10_000_000.0;

/// Default carbon credit bounds (kg CO2)
pub const MIN_CARBON_KG: f64 = 0.001;
pub const MAX_CARBON_KG: f64 = 1_000_000.0;

/// Minimum length of a participant identifier
pub const MIN_IDENTITY_LEN: usize = 3;

/// Default maximum number of pending records in the pool
pub const MAX_PENDING: usize = 100;

/// Default proof-of-work difficulty (leading zero hex characters)
pub const DEFAULT_DIFFICULTY: u32 = 3;

/// Difficulty band limits
pub const MIN_DIFFICULTY: u32 = 1;
pub const MAX_DIFFICULTY: u32 = 8;

/// Number of blocks between difficulty re-evaluations
pub const DIFFICULTY_ADJUSTMENT_INTERVAL: u64 = 10;

/// Target seal time per block
pub const TARGET_SEAL_TIME: Duration = Duration::from_secs(10);

/// Base mining reward in tokens, halved every `HALVING_INTERVAL` blocks
pub const BASE_REWARD: f64 = 100.0;

/// Reward floor after halving
pub const MIN_REWARD: f64 = 1.0;

/// Blocks between reward halvings
pub const HALVING_INTERVAL: u64 = 100;

/// Tokens credited per metered kWh before the source bonus
pub const ENERGY_TOKEN_RATE: f64 = 10.0;

/// Default result cache geometry
pub const CACHE_CAPACITY: usize = 256;
pub const CACHE_TTL: Duration = Duration::from_secs(30);

/// Multiplicative reward adjustments derived from a block's resource summary.
///
/// Source and efficiency tiers do not stack within themselves: a renewable
/// block does not also collect the nuclear bonus, and the two efficiency
/// tiers are exclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct BonusPolicy {
    pub renewable: f64,
    pub nuclear: f64,
    pub high_efficiency: f64,
    pub high_efficiency_floor: f64,
    pub mid_efficiency: f64,
    pub mid_efficiency_floor: f64,
    pub inference: f64,
}

impl Default for BonusPolicy {
    fn default() -> Self {
        Self {
            renewable: 1.5,
            nuclear: 1.2,
            high_efficiency: 1.3,
            high_efficiency_floor: 80.0,
            mid_efficiency: 1.1,
            mid_efficiency_floor: 60.0,
            inference: 1.2,
        }
    }
}

impl BonusPolicy {
    /// Multiplier contributed by the energy source alone.
    /// Also used when pricing tokenized energy.
    pub fn source_multiplier(&self, source: EnergySource) -> f64 {
        match source {
            EnergySource::Renewable => self.renewable,
            EnergySource::Nuclear => self.nuclear,
            EnergySource::Fossil | EnergySource::Mixed => 1.0,
        }
    }

    /// Full reward multiplier for a sealed block's resource summary
    pub fn multiplier(&self, source: EnergySource, efficiency: f64, workload: WorkloadType) -> f64 {
        let mut bonus = self.source_multiplier(source);

        if efficiency > self.high_efficiency_floor {
            bonus *= self.high_efficiency;
        } else if efficiency > self.mid_efficiency_floor {
            bonus *= self.mid_efficiency;
        }

        if workload == WorkloadType::Inference {
            bonus *= self.inference;
        }

        bonus
    }
}

/// Full ledger configuration
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    // Validation bounds
    pub min_amount: f64,
    pub max_amount: f64,
    pub min_energy_kwh: f64,
    pub max_energy_kwh: f64,
    pub min_compute_units: f64,
    pub max_compute_units: f64,
    pub min_carbon_kg: f64,
    pub max_carbon_kg: f64,
    pub min_identity_len: usize,

    // Pool
    pub max_pending: usize,

    // Mining and difficulty
    pub initial_difficulty: u32,
    pub min_difficulty: u32,
    pub max_difficulty: u32,
    pub adjustment_interval: u64,
    pub target_seal_time: Duration,

    // Rewards
    pub base_reward: f64,
    pub min_reward: f64,
    pub halving_interval: u64,
    pub energy_token_rate: f64,
    pub bonus: BonusPolicy,

    // Result caches
    pub cache_capacity: usize,
    pub cache_ttl: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            min_amount: MIN_TX_AMOUNT,
            max_amount: MAX_TX_AMOUNT,
            min_energy_kwh: MIN_ENERGY_KWH,
            max_energy_kwh: MAX_ENERGY_KWH,
            min_compute_units: MIN_COMPUTE_UNITS,
            max_compute_units: MAX_COMPUTE_UNITS,
            min_carbon_kg: MIN_CARBON_KG,
            max_carbon_kg: MAX_CARBON_KG,
            min_identity_len: MIN_IDENTITY_LEN,
            max_pending: MAX_PENDING,
            initial_difficulty: DEFAULT_DIFFICULTY,
            min_difficulty: MIN_DIFFICULTY,
            max_difficulty: MAX_DIFFICULTY,
            adjustment_interval: DIFFICULTY_ADJUSTMENT_INTERVAL,
            target_seal_time: TARGET_SEAL_TIME,
            base_reward: BASE_REWARD,
            min_reward: MIN_REWARD,
            halving_interval: HALVING_INTERVAL,
            energy_token_rate: ENERGY_TOKEN_RATE,
            bonus: BonusPolicy::default(),
            cache_capacity: CACHE_CAPACITY,
            cache_ttl: CACHE_TTL,
        }
    }
}
