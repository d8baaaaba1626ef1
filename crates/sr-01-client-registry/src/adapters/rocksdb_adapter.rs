//! # RocksDB Document Store
//!
//! Durable `DocumentStore` on a RocksDB `OptimisticTransactionDB`.
//!
//! ## Layout
//!
//! One key per document, `collection/id`, with the JSON document as the
//! value. Collections are listed by seeking to the `collection/` prefix.
//!
//! ## Concurrency
//!
//! Reads inside a transaction use `get_for_update`, so RocksDB validates
//! them at commit time. `Busy` and `TryAgain` commit errors discard the
//! attempt and re-run the body.

use rocksdb::{
    BlockBasedOptions, Direction, ErrorKind, IteratorMode, OptimisticTransactionDB, Options,
    SingleThreaded, Transaction,
};
use serde_json::Value;
use shared_types::{Collection, DocumentPath};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::domain::value_objects::StoreConfig;
use crate::metrics;
use crate::ports::outbound::{DocumentStore, DocumentTransaction, StoreError};

type Db = OptimisticTransactionDB<SingleThreaded>;

/// RocksDB tuning knobs.
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: PathBuf,
    /// Block cache size in bytes (default: 64MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 16MB)
    pub write_buffer_size: usize,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/registry-rocksdb"),
            block_cache_size: 64 * 1024 * 1024,
            write_buffer_size: 16 * 1024 * 1024,
        }
    }
}

impl RocksDbConfig {
    /// Create config for testing (smaller buffers)
    pub fn for_testing(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            block_cache_size: 8 * 1024 * 1024,
            write_buffer_size: 4 * 1024 * 1024,
        }
    }
}

pub struct RocksDbDocumentStore {
    db: Db,
    max_attempts: u32,
}

impl RocksDbDocumentStore {
    /// Open or create the database.
    pub fn open(config: &RocksDbConfig, store: &StoreConfig) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let mut block_opts = BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let db = Db::open(&opts, &config.path).map_err(|e| StoreError::Backend {
            message: format!("Failed to open RocksDB: {e}"),
        })?;
        info!(path = %config.path.display(), "[sr-01] Opened RocksDB document store");

        Ok(Self {
            db,
            max_attempts: store.max_attempts.max(1),
        })
    }
}

fn decode(bytes: &[u8]) -> Result<Value, StoreError> {
    serde_json::from_slice(bytes).map_err(StoreError::codec)
}

fn encode(value: &Value) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(value).map_err(StoreError::codec)
}

fn is_retryable(err: &rocksdb::Error) -> bool {
    matches!(err.kind(), ErrorKind::Busy | ErrorKind::TryAgain)
}

struct RocksTransaction<'db> {
    txn: Transaction<'db, Db>,
}

impl DocumentTransaction for RocksTransaction<'_> {
    fn get(&mut self, path: &DocumentPath) -> Result<Option<Value>, StoreError> {
        self.txn
            .get_for_update(path.key(), true)
            .map_err(StoreError::backend)?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    fn set(&mut self, path: DocumentPath, value: Value) -> Result<(), StoreError> {
        self.txn
            .put(path.key(), encode(&value)?)
            .map_err(StoreError::backend)
    }

    fn delete(&mut self, path: DocumentPath) -> Result<(), StoreError> {
        self.txn.delete(path.key()).map_err(StoreError::backend)
    }
}

impl DocumentStore for RocksDbDocumentStore {
    fn get(&self, path: &DocumentPath) -> Result<Option<Value>, StoreError> {
        self.db
            .get(path.key())
            .map_err(StoreError::backend)?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    fn list(&self, collection: Collection) -> Result<Vec<(String, Value)>, StoreError> {
        let prefix = format!("{}/", collection.as_str());
        let mut documents = Vec::new();
        for item in self
            .db
            .iterator(IteratorMode::From(prefix.as_bytes(), Direction::Forward))
        {
            let (key, value) = item.map_err(StoreError::backend)?;
            let Some(id) = key.strip_prefix(prefix.as_bytes()) else {
                break;
            };
            let id = String::from_utf8(id.to_vec()).map_err(StoreError::codec)?;
            documents.push((id, decode(&value)?));
        }
        Ok(documents)
    }

    fn run_transaction<T, E, F>(&self, mut body: F) -> Result<T, E>
    where
        F: FnMut(&mut dyn DocumentTransaction) -> Result<T, E>,
        E: From<StoreError>,
    {
        for attempt in 1..=self.max_attempts {
            let mut txn = RocksTransaction {
                txn: self.db.transaction(),
            };
            let value = match body(&mut txn) {
                Ok(value) => value,
                Err(err) => {
                    txn.txn.rollback().map_err(StoreError::backend)?;
                    return Err(err);
                }
            };

            match txn.txn.commit() {
                Ok(()) => {
                    metrics::record_transaction_attempts(attempt);
                    return Ok(value);
                }
                Err(err) if is_retryable(&err) => {
                    metrics::record_transaction_conflict();
                    debug!(attempt, error = %err, "RocksDB commit conflict, retrying");
                }
                Err(err) => {
                    warn!(attempt, error = %err, "RocksDB commit failed");
                    return Err(StoreError::backend(err).into());
                }
            }
        }

        warn!(max_attempts = self.max_attempts, "Transaction retry budget exhausted");
        Err(StoreError::Conflict {
            attempts: self.max_attempts,
        }
        .into())
    }
}
