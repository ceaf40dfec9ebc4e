use crate::errors::{DbError, DbResult};
use parking_lot::RwLock;
use rocksdb::{ColumnFamilyDescriptor, Options, DB};
use std::path::Path;
use std::sync::Arc;

pub const CF_STATS: &str = "stats";

/// Thin RocksDB wrapper holding the simulator's column families.
pub struct Database {
    db: Arc<DB>,
    is_closed: Arc<RwLock<bool>>,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_keep_log_file_num(10);
        opts.set_max_open_files(256);

        let cf_descriptors = vec![ColumnFamilyDescriptor::new(CF_STATS, Options::default())];

        let db = DB::open_cf_descriptors(&opts, path, cf_descriptors)?;
        Ok(Self {
            db: Arc::new(db),
            is_closed: Arc::new(RwLock::new(false)),
        })
    }

    fn check_closed(&self) -> DbResult<()> {
        if *self.is_closed.read() {
            return Err(DbError::DatabaseClosed);
        }
        Ok(())
    }

    fn get_cf_handle(&self, cf_name: &str) -> DbResult<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(cf_name)
            .ok_or_else(|| DbError::ColumnFamilyNotFound(cf_name.to_string()))
    }

    pub fn put(&self, cf_name: &str, key: &[u8], value: &[u8]) -> DbResult<()> {
        self.check_closed()?;
        let cf = self.get_cf_handle(cf_name)?;
        self.db.put_cf(cf, key, value)?;
        Ok(())
    }

    pub fn get(&self, cf_name: &str, key: &[u8]) -> DbResult<Option<Vec<u8>>> {
        self.check_closed()?;
        let cf = self.get_cf_handle(cf_name)?;
        Ok(self.db.get_cf(cf, key)?)
    }

    pub fn exists(&self, cf_name: &str, key: &[u8]) -> DbResult<bool> {
        self.check_closed()?;
        let cf = self.get_cf_handle(cf_name)?;
        Ok(self.db.get_pinned_cf(cf, key)?.is_some())
    }

    /// Marks the handle closed; later reads and writes fail fast.
    pub fn close(&self) {
        *self.is_closed.write() = true;
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            is_closed: self.is_closed.clone(),
        }
    }
}
