//! Persistence seam for the cumulative mining statistics
//!
//! The engine owns exactly one durable record (balance, block count, mean
//! search time) and talks to it through the [`StatsStore`] trait so the
//! search loop stays independent of storage technology. The `database`
//! crate provides the RocksDB-backed implementation; [`MemoryStatsStore`]
//! backs tests and ephemeral runs.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use thiserror::Error;

/// Errors surfaced by a stats store implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store cannot currently be read or written.
    #[error("Stats store unavailable: {0}")]
    Unavailable(String),

    /// The stored record exists but could not be decoded.
    #[error("Corrupt stats record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The durable record: cumulative totals that survive process restarts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedStats {
    /// Cumulative reward earned.
    pub balance: f64,
    /// Cumulative number of blocks found.
    pub blocks_mined: u64,
    /// Mean search duration over every block ever found, seconds.
    pub average_time: f64,
}

/// Partial update of the durable record.
///
/// `None` fields keep whatever the store already holds, so a caller can
/// touch one column without re-writing the others.
#[derive(Clone, Copy, Debug, Default)]
pub struct StatsUpdate {
    pub balance: Option<f64>,
    pub blocks_mined: Option<u64>,
    pub average_time: Option<f64>,
}

impl StatsUpdate {
    /// An update that replaces every field.
    pub fn full(stats: PersistedStats) -> Self {
        Self {
            balance: Some(stats.balance),
            blocks_mined: Some(stats.blocks_mined),
            average_time: Some(stats.average_time),
        }
    }

    /// Folds this update into an existing record.
    pub fn apply_to(&self, stats: &mut PersistedStats) {
        if let Some(balance) = self.balance {
            stats.balance = balance;
        }
        if let Some(blocks_mined) = self.blocks_mined {
            stats.blocks_mined = blocks_mined;
        }
        if let Some(average_time) = self.average_time {
            stats.average_time = average_time;
        }
    }
}

/// Storage interface the engine persists through.
///
/// Implementations hold exactly one logical record and must return zero
/// defaults from `load` when nothing has been written yet.
pub trait StatsStore: Send + Sync {
    /// Reads the current record.
    fn load(&self) -> StoreResult<PersistedStats>;

    /// Applies a partial update to the record.
    fn save(&self, update: StatsUpdate) -> StoreResult<()>;
}

/// In-memory store for tests and ephemeral runs. Nothing survives drop.
#[derive(Debug, Default)]
pub struct MemoryStatsStore {
    record: Mutex<PersistedStats>,
}

impl MemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatsStore for MemoryStatsStore {
    fn load(&self) -> StoreResult<PersistedStats> {
        Ok(*self.record.lock().unwrap_or_else(|e| e.into_inner()))
    }

    fn save(&self, update: StatsUpdate) -> StoreResult<()> {
        let mut record = self.record.lock().unwrap_or_else(|e| e.into_inner());
        update.apply_to(&mut record);
        Ok(())
    }
}
