//! # Adapters
//!
//! Implementations of the outbound ports.
//!
//! ## Modules
//!
//! - `memory` - In-memory document store (tests, ephemeral runs)
//! - `file` - JSON snapshot document store
//! - `rocksdb_adapter` - RocksDB optimistic-transaction store (feature `rocksdb`)
//! - `time` - System and fixed clocks

mod file;
mod memory;
#[cfg(feature = "rocksdb")]
mod rocksdb_adapter;
mod time;
mod versioned;

pub use file::FileBackedDocumentStore;
pub use memory::InMemoryDocumentStore;
#[cfg(feature = "rocksdb")]
pub use rocksdb_adapter::{RocksDbConfig, RocksDbDocumentStore};
pub use time::{FixedTimeSource, SystemTimeSource};
