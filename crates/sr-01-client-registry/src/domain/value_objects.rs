//! # Value Objects
//!
//! Configuration and query parameters for the registry.

use std::env;
use std::path::PathBuf;

/// Registry configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Exact digit count a phone number must have after stripping non-digits.
    pub phone_digits: usize,
    /// Document id of the sequence counter in `sequence_counters`.
    pub counter_name: String,
    /// Whether `delete_client` rejects a blank reason.
    pub require_delete_reason: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            phone_digits: 10,
            counter_name: "clients".to_string(),
            require_delete_reason: true,
        }
    }
}

impl RegistryConfig {
    /// Create configuration from environment variables.
    ///
    /// - `SR_PHONE_DIGITS` (default: 10)
    /// - `SR_REQUIRE_DELETE_REASON` (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            phone_digits: env::var("SR_PHONE_DIGITS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|digits| *digits > 0)
                .unwrap_or(defaults.phone_digits),
            counter_name: defaults.counter_name,
            require_delete_reason: env::var("SR_REQUIRE_DELETE_REASON")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.require_delete_reason),
        }
    }
}

/// Document store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// How many times a conflicting transaction body is re-run before the
    /// store gives up.
    pub max_attempts: u32,
    /// Snapshot file for the file-backed store.
    pub data_file: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            data_file: PathBuf::from("./data/registry.json"),
        }
    }
}

impl StoreConfig {
    /// Create configuration from environment variables.
    ///
    /// - `SR_TXN_MAX_ATTEMPTS` (default: 5)
    /// - `SR_DATA_FILE` (default: ./data/registry.json)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_attempts: env::var("SR_TXN_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|attempts| *attempts > 0)
                .unwrap_or(defaults.max_attempts),
            data_file: env::var("SR_DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_file),
        }
    }

    /// Config with a custom retry budget.
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }
}

/// Filter for `list_clients`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientFilter {
    /// Only clients whose `active` flag equals this value.
    pub active: Option<bool>,
    /// Only clients whose normalized name starts with the normalized form of
    /// this prefix.
    pub name_prefix: Option<String>,
}

impl ClientFilter {
    pub fn active_only() -> Self {
        Self {
            active: Some(true),
            name_prefix: None,
        }
    }
}
