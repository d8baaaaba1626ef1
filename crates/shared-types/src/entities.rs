//! # Core Identifiers
//!
//! - `ClientId`: fixed-width, zero-padded sequence number (`"000001"`).
//! - `UserId`: identity token of the acting user, as supplied by the caller.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::IdError;

/// Number of decimal digits in every client ID.
pub const CLIENT_ID_WIDTH: usize = 6;

/// Largest sequence number representable in `CLIENT_ID_WIDTH` digits.
pub const MAX_CLIENT_SEQUENCE: u64 = 999_999;

/// Identifier of a client record.
///
/// Always exactly [`CLIENT_ID_WIDTH`] ASCII digits and never `000000`.
/// Ordering of the string form matches numeric ordering because the width
/// is fixed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientId(String);

impl ClientId {
    /// Format a sequence number as a client ID.
    pub fn from_sequence(number: u64) -> Result<Self, IdError> {
        if number == 0 {
            return Err(IdError::ZeroSequence);
        }
        if number > MAX_CLIENT_SEQUENCE {
            return Err(IdError::SequenceOverflow {
                number,
                width: CLIENT_ID_WIDTH,
            });
        }
        Ok(Self(format!("{:0width$}", number, width = CLIENT_ID_WIDTH)))
    }

    /// Parse a client ID from its string form.
    pub fn parse(value: &str) -> Result<Self, IdError> {
        let malformed = || IdError::MalformedClientId {
            value: value.to_string(),
            width: CLIENT_ID_WIDTH,
        };
        if value.len() != CLIENT_ID_WIDTH || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        if value.bytes().all(|b| b == b'0') {
            return Err(malformed());
        }
        Ok(Self(value.to_string()))
    }

    /// Numeric sequence value.
    pub fn sequence(&self) -> u64 {
        // Construction guarantees six ASCII digits.
        self.0.parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ClientId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ClientId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ClientId> for String {
    fn from(id: ClientId) -> Self {
        id.0
    }
}

/// Identity token of the user performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Build a user ID, trimming surrounding whitespace.
    pub fn new(value: impl AsRef<str>) -> Result<Self, IdError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdError::BlankUserId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}
