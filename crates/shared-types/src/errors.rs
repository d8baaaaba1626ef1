//! # Error Types
//!
//! Errors raised while constructing shared identifiers.

use thiserror::Error;

/// Errors that can occur when parsing or building identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// Client ID is not exactly `CLIENT_ID_WIDTH` ASCII digits.
    #[error("Malformed client id {value:?}: expected {width} decimal digits")]
    MalformedClientId { value: String, width: usize },

    /// Sequence number does not fit in the fixed client-ID width.
    #[error("Sequence number {number} does not fit in {width} digits")]
    SequenceOverflow { number: u64, width: usize },

    /// Sequence number zero is never issued.
    #[error("Sequence number must be greater than zero")]
    ZeroSequence,

    /// User identity token is blank.
    #[error("User id must not be blank")]
    BlankUserId,
}
