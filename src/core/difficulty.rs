//! Adaptive proof-of-work difficulty
//!
//! Keeps a bounded sliding window of observed seal durations and nudges the
//! difficulty by one step at interval boundaries. The /2 and x2 band around
//! the target is a deliberate hysteresis: coarse on purpose, so difficulty
//! does not oscillate on noisy seal times.

use crate::core::config::LedgerConfig;
use log::info;
use std::collections::VecDeque;
use std::time::Duration;

/// Observes seal durations and adjusts difficulty within a fixed band
#[derive(Debug, Clone)]
pub struct DifficultyController {
    /// Most recent seal durations, oldest first; at most 2x the interval
    window: VecDeque<Duration>,
    interval: u64,
    target: Duration,
    min_difficulty: u32,
    max_difficulty: u32,
}

impl DifficultyController {
    pub fn new(config: &LedgerConfig) -> Self {
        Self {
            window: VecDeque::new(),
            interval: config.adjustment_interval,
            target: config.target_seal_time,
            min_difficulty: config.min_difficulty,
            max_difficulty: config.max_difficulty,
        }
    }

    /// Record the duration of a completed seal
    pub fn record(&mut self, seal_time: Duration) {
        self.window.push_back(seal_time);
        let cap = (self.interval as usize).saturating_mul(2).max(1);
        while self.window.len() > cap {
            self.window.pop_front();
        }
    }

    /// Number of retained samples
    pub fn samples(&self) -> usize {
        self.window.len()
    }

    /// Re-evaluate difficulty for a chain of the given length.
    ///
    /// Adjusts only at exact interval multiples and only once at least two
    /// samples exist; otherwise the current difficulty stands.
    pub fn evaluate(&self, chain_len: u64, current: u32) -> u32 {
        if self.interval == 0 || chain_len % self.interval != 0 {
            return current;
        }
        if self.window.len() < 2 {
            return current;
        }

        let count = (self.interval as usize).min(self.window.len());
        let total: Duration = self.window.iter().rev().take(count).sum();
        let mean = total / count as u32;

        let adjusted = if mean < self.target / 2 {
            (current + 1).min(self.max_difficulty)
        } else if mean > self.target * 2 {
            current.saturating_sub(1).max(self.min_difficulty)
        } else {
            current
        };

        if adjusted != current {
            info!(
                "Difficulty adjusted from {} to {} (mean seal time {:?}, target {:?})",
                current, adjusted, mean, self.target
            );
        }

        adjusted
    }
}
