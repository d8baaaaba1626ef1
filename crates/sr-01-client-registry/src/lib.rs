//! # Client Registry (sr-01)
//!
//! Registers the clients of the stockroom and hands out their identifiers.
//!
//! ## Responsibilities
//!
//! - Allocate sequential, zero-padded client IDs (`000001`, `000002`, ...)
//! - Keep the normalized legal ID unique across all clients via an index
//!   document written in the same transaction as the client
//! - Append an audit entry for every mutation
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Unique Legal ID | At most one client per normalized legal ID |
//! | 2 | Monotonic IDs | The counter only moves forward; IDs are never reused |
//! | 3 | Atomic Mutations | Client, counter, index and audit commit together or not at all |
//! | 4 | Validate First | Invalid input never reaches the store |
//! | 5 | Append-only Audit | Audit entries are never rewritten or deleted |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Entities, normalization, validation, errors, configuration
//! - `ports/` - `ClientRegistryApi` (inbound), `DocumentStore` and `TimeSource` (outbound)
//! - `adapters/` - In-memory, file-backed and RocksDB document stores; clocks
//! - `service/` - Application service implementing the API
//! - `metrics` - Prometheus counters and histograms (feature `metrics`)
//!
//! ## Usage
//!
//! ```ignore
//! use sr_01_client_registry::{ClientInput, ClientRegistryApi, ClientRegistryService};
//!
//! let service = ClientRegistryService::new_in_memory(Default::default(), Default::default());
//! let admin = UserId::new("admin")?;
//! let id = service
//!     .create_client(ClientInput::new("Ferretería Central", "123-45-678"), admin)
//!     .await?;
//! assert_eq!(id.as_str(), "000001");
//! ```

pub mod adapters;
pub mod domain;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-export key types for convenience
pub use adapters::{FileBackedDocumentStore, FixedTimeSource, InMemoryDocumentStore, SystemTimeSource};
#[cfg(feature = "rocksdb")]
pub use adapters::{RocksDbConfig, RocksDbDocumentStore};
pub use domain::entities::{AuditAction, AuditEntry, Client};
pub use domain::errors::{RegistryError, RegistryResult};
pub use domain::validation::{ClientInput, ClientPatch, FieldPatch};
pub use domain::value_objects::{ClientFilter, RegistryConfig, StoreConfig};
pub use ports::inbound::ClientRegistryApi;
pub use ports::outbound::{DocumentStore, DocumentTransaction, StoreError, TimeSource};
pub use service::ClientRegistryService;
