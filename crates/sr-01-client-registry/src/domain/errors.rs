//! # Domain Errors
//!
//! Error taxonomy of the client registry.
//!
//! ## Design Principles
//!
//! - Validation failures never reach the store
//! - Store failures are surfaced verbatim as `Transaction`
//! - Every failure path is a typed variant; nothing is swallowed

use shared_types::{ClientId, IdError};
use thiserror::Error;

use crate::ports::outbound::StoreError;

/// Result alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors returned by the client registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A field failed a precondition. Raised before any store access.
    #[error("Invalid {field}: {message}")]
    InvalidInput { field: &'static str, message: String },

    /// The normalized legal ID already belongs to another client.
    #[error("Legal id {legal_id} is already registered to client {owner}")]
    DuplicateLegalId { legal_id: String, owner: ClientId },

    /// The requested change would not alter the stored client.
    #[error("No change for client {client_id}: {detail}")]
    NoOp { client_id: ClientId, detail: String },

    /// The referenced client does not exist (or was deleted concurrently).
    #[error("Client not found: {client_id}")]
    NotFound { client_id: ClientId },

    /// The store failed, or conflicts exhausted its retry budget.
    #[error("Transaction failed: {message}")]
    Transaction { message: String },

    /// The fixed-width sequence has no numbers left.
    #[error("Client sequence exhausted: last issued number is {last_number}")]
    SequenceExhausted { last_number: u64 },
}

impl RegistryError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        RegistryError::InvalidInput {
            field,
            message: message.into(),
        }
    }

    /// Stable label for metrics and CLI exit codes.
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryError::InvalidInput { .. } => "invalid_input",
            RegistryError::DuplicateLegalId { .. } => "duplicate_legal_id",
            RegistryError::NoOp { .. } => "no_op",
            RegistryError::NotFound { .. } => "not_found",
            RegistryError::Transaction { .. } => "transaction",
            RegistryError::SequenceExhausted { .. } => "sequence_exhausted",
        }
    }

    /// True for failures the user resolves by editing the form or
    /// refreshing the screen.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RegistryError::InvalidInput { .. }
                | RegistryError::DuplicateLegalId { .. }
                | RegistryError::NoOp { .. }
                | RegistryError::NotFound { .. }
        )
    }

    /// True for failures that may succeed on a manual retry without changes.
    pub fn is_transient(&self) -> bool {
        matches!(self, RegistryError::Transaction { .. })
    }
}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        RegistryError::Transaction {
            message: err.to_string(),
        }
    }
}

impl From<IdError> for RegistryError {
    fn from(err: IdError) -> Self {
        let field = match err {
            IdError::BlankUserId => "acting_user_id",
            _ => "client_id",
        };
        RegistryError::InvalidInput {
            field,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_surfaces_verbatim() {
        let err: RegistryError = StoreError::Conflict { attempts: 5 }.into();
        match err {
            RegistryError::Transaction { message } => assert!(message.contains("5 attempts")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_classification() {
        let dup = RegistryError::DuplicateLegalId {
            legal_id: "12345678".into(),
            owner: ClientId::from_sequence(1).unwrap(),
        };
        assert!(dup.is_recoverable());
        assert!(!dup.is_transient());
        assert_eq!(dup.kind(), "duplicate_legal_id");

        let txn = RegistryError::Transaction {
            message: "busy".into(),
        };
        assert!(txn.is_transient());
        assert!(!txn.is_recoverable());
        assert!(!RegistryError::SequenceExhausted { last_number: 999_999 }.is_recoverable());
    }

    #[test]
    fn test_id_error_maps_to_field() {
        let err: RegistryError = IdError::BlankUserId.into();
        assert!(matches!(
            err,
            RegistryError::InvalidInput {
                field: "acting_user_id",
                ..
            }
        ));
    }
}
