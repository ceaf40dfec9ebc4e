//! Durable stats record backed by RocksDB
//!
//! One bincode-encoded [`PersistedStats`] record lives under a fixed key in
//! the `stats` column family. The record is created with zero defaults the
//! first time the store opens, and partial saves are resolved here with a
//! read-modify-write so the engine never has to know what the other fields
//! hold.

use crate::db::{Database, CF_STATS};
use crate::errors::DbResult;
use mining::store::{PersistedStats, StatsStore, StatsUpdate, StoreResult};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

const STATS_KEY: &[u8] = b"mining_stats";

pub struct MiningStatsStore {
    db: Arc<Database>,
}

impl MiningStatsStore {
    /// Wraps an open database, creating the zero-default record if this is
    /// the first run against it.
    pub fn new(db: Arc<Database>) -> DbResult<Self> {
        let store = Self { db };
        if !store.db.exists(CF_STATS, STATS_KEY)? {
            store.write_record(&PersistedStats::default())?;
            debug!("created zero-default stats record");
        }
        Ok(store)
    }

    /// Opens a database at `path` and wraps it.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let db = Arc::new(Database::open(path)?);
        Self::new(db)
    }

    fn read_record(&self) -> DbResult<PersistedStats> {
        match self.db.get(CF_STATS, STATS_KEY)? {
            Some(bytes) => Ok(bincode::deserialize(&bytes)?),
            None => Ok(PersistedStats::default()),
        }
    }

    fn write_record(&self, stats: &PersistedStats) -> DbResult<()> {
        let bytes = bincode::serialize(stats)?;
        self.db.put(CF_STATS, STATS_KEY, &bytes)
    }
}

impl StatsStore for MiningStatsStore {
    fn load(&self) -> StoreResult<PersistedStats> {
        Ok(self.read_record()?)
    }

    fn save(&self, update: StatsUpdate) -> StoreResult<()> {
        let mut stats = self.read_record()?;
        update.apply_to(&mut stats);
        Ok(self.write_record(&stats)?)
    }
}
