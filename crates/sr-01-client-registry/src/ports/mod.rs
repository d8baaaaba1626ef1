//! # Ports Layer
//!
//! ## Hexagonal Architecture
//!
//! - `inbound.rs` - Driving ports (API exposed to callers)
//! - `outbound.rs` - Driven ports (document store, clock)

pub mod inbound;
pub mod outbound;

pub use inbound::ClientRegistryApi;
pub use outbound::{DocumentStore, DocumentTransaction, StoreError, TimeSource};
