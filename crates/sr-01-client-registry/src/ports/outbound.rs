//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the Client Registry service.
//!
//! The registry never locks anything itself. Every mutation is a closure
//! handed to [`DocumentStore::run_transaction`]; the store tracks what the
//! closure read, and re-runs it when a concurrent commit invalidated one of
//! those reads.

use chrono::{DateTime, Utc};
use serde_json::Value;
use shared_types::{Collection, DocumentPath};
use thiserror::Error;

/// Document store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Concurrent commits invalidated the read set on every attempt.
    #[error("Transaction aborted after {attempts} attempts due to conflicting writes")]
    Conflict { attempts: u32 },

    /// The storage engine failed (I/O, corruption, engine error).
    #[error("Storage backend error: {message}")]
    Backend { message: String },

    /// A stored document could not be encoded or decoded.
    #[error("Document codec error: {message}")]
    Codec { message: String },
}

impl StoreError {
    pub fn backend(err: impl std::fmt::Display) -> Self {
        StoreError::Backend {
            message: err.to_string(),
        }
    }

    pub fn codec(err: impl std::fmt::Display) -> Self {
        StoreError::Codec {
            message: err.to_string(),
        }
    }
}

/// Read/write handle passed to a transaction body.
///
/// Reads observe the snapshot the attempt started from, overlaid with the
/// body's own buffered writes. Writes become visible to other readers only
/// when the whole body commits.
pub trait DocumentTransaction {
    /// Read a document and add it to the read set.
    fn get(&mut self, path: &DocumentPath) -> Result<Option<Value>, StoreError>;

    /// Buffer a full-document write.
    fn set(&mut self, path: DocumentPath, value: Value) -> Result<(), StoreError>;

    /// Buffer a delete. Deleting an absent document is not an error.
    fn delete(&mut self, path: DocumentPath) -> Result<(), StoreError>;
}

/// Abstract interface for the document database.
///
/// Production: `FileBackedDocumentStore`, or `RocksDbDocumentStore` with the
/// `rocksdb` feature.
/// Testing: `InMemoryDocumentStore`.
pub trait DocumentStore: Send + Sync {
    /// Read a committed document outside any transaction.
    fn get(&self, path: &DocumentPath) -> Result<Option<Value>, StoreError>;

    /// All committed documents of a collection as `(id, document)` pairs,
    /// in id order.
    fn list(&self, collection: Collection) -> Result<Vec<(String, Value)>, StoreError>;

    /// Run `body` as one optimistic transaction.
    ///
    /// ## Guarantees
    ///
    /// - Buffered writes are applied all together or not at all.
    /// - If any document read by the body changed before commit, the buffer
    ///   is discarded and `body` runs again, up to the configured attempt
    ///   budget. Exhaustion yields `StoreError::Conflict`.
    /// - If `body` returns `Err`, nothing is written and the error is
    ///   returned as-is.
    ///
    /// `body` must therefore be safe to run more than once.
    fn run_transaction<T, E, F>(&self, body: F) -> Result<T, E>
    where
        F: FnMut(&mut dyn DocumentTransaction) -> Result<T, E>,
        E: From<StoreError>;
}

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
