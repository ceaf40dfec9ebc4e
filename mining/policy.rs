//! Difficulty and reward policy
//!
//! A single-sample negative-feedback controller keeps search times inside a
//! target band: finds faster than the lower threshold raise the difficulty
//! by one, finds slower than the upper threshold lower it by one, floored at
//! the minimum. The per-block reward halves every ten cumulative blocks.
//! No smoothing or windowing is applied on top of the single-sample rule.

/// Difficulty can never be adjusted below this.
pub const MIN_DIFFICULTY: u32 = 1;

/// The reward halves whenever the cumulative block count hits a multiple of
/// this interval.
pub const HALVING_INTERVAL: u64 = 10;

/// Thresholds for the per-find difficulty adjustment.
#[derive(Clone, Copy, Debug)]
pub struct DifficultyPolicy {
    /// Finds faster than this raise the difficulty by one (seconds).
    pub raise_below_secs: f64,
    /// Finds slower than this lower the difficulty by one (seconds).
    pub lower_above_secs: f64,
}

impl Default for DifficultyPolicy {
    fn default() -> Self {
        Self {
            raise_below_secs: 5.0,
            lower_above_secs: 15.0,
        }
    }
}

impl DifficultyPolicy {
    /// Applies the single-sample rule to one find's search duration.
    ///
    /// Durations inside the band leave the difficulty unchanged; the
    /// thresholds themselves are inside the band.
    pub fn next_difficulty(&self, difficulty: u32, time_taken: f64) -> u32 {
        if time_taken < self.raise_below_secs {
            difficulty.saturating_add(1)
        } else if time_taken > self.lower_above_secs {
            difficulty.saturating_sub(1).max(MIN_DIFFICULTY)
        } else {
            difficulty
        }
    }
}

/// Halves the reward when the post-increment block count lands on a halving
/// boundary, rounding to 8 decimals; otherwise returns it unchanged.
pub fn halve_reward_if_due(reward: f64, blocks_mined: u64) -> f64 {
    if blocks_mined > 0 && blocks_mined % HALVING_INTERVAL == 0 {
        round8(reward / 2.0)
    } else {
        reward
    }
}

/// Running mean over every block ever found.
///
/// `total_time` is the accumulated sum of past search durations (seeded from
/// `persisted average * persisted count` at engine construction) and
/// `blocks_mined` the post-increment count.
pub fn running_average(total_time: f64, time_taken: f64, blocks_mined: u64) -> f64 {
    if blocks_mined == 0 {
        return 0.0;
    }
    round2((total_time + time_taken) / blocks_mined as f64)
}

/// Rounds to 2 decimal places. Used for durations.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rounds to 8 decimal places. Used for reward amounts.
pub fn round8(value: f64) -> f64 {
    (value * 1e8).round() / 1e8
}
