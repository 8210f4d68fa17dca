//! Mining reward schedule
//!
//! The base reward decays geometrically with chain height: it halves every
//! `halving_interval` blocks and never drops below the configured floor.

use crate::core::config::LedgerConfig;

/// Base reward for a block at the given chain height, before the resource
/// bonus is applied. Pure and monotonically non-increasing in height.
pub fn block_reward(config: &LedgerConfig, height: u64) -> f64 {
    let halvings = height / config.halving_interval.max(1);
    // 2^1024 overflows f64; the schedule floored out long before that
    if halvings >= 1024 {
        return config.min_reward;
    }
    let decayed = config.base_reward / 2.0_f64.powi(halvings as i32);
    decayed.max(config.min_reward)
}
