//! # Domain Layer
//!
//! Pure domain logic for the Client Registry subsystem. Nothing here touches
//! the store.
//!
//! ## Modules
//!
//! - `entities` - Client, sequence counter, legal-ID index entry, audit entry
//! - `errors` - `RegistryError` taxonomy
//! - `normalize` - Canonical forms for legal IDs, names, phones and emails
//! - `validation` - Form input and patch validation
//! - `value_objects` - Configuration and list filters

pub mod entities;
pub mod errors;
pub mod normalize;
pub mod validation;
pub mod value_objects;

pub use entities::{
    client_path, counter_path, legal_index_path, AuditAction, AuditEntry, Client,
    LegalIdIndexEntry, SequenceCounter,
};
pub use errors::{RegistryError, RegistryResult};
pub use validation::{
    validate_input, validate_patch, validate_reason, ClientInput, ClientPatch, FieldPatch,
    ValidatedClient, ValidatedPatch,
};
pub use value_objects::{ClientFilter, RegistryConfig, StoreConfig};
