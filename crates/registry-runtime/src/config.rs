//! # Runtime Configuration
//!
//! Environment first, command-line flags on top.

use sr_01_client_registry::{RegistryConfig, StoreConfig};
use std::env;
use stockroom_telemetry::TelemetryConfig;
use thiserror::Error;

use crate::cli::{Backend, Cli};

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown storage backend {0:?} (expected file, memory or rocksdb)")]
    UnknownBackend(String),

    #[error("The rocksdb backend requires building with `--features rocksdb`")]
    RocksDbUnavailable,
}

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub telemetry: TelemetryConfig,
    pub registry: RegistryConfig,
    pub store: StoreConfig,
    pub backend: Backend,
    pub acting_user: Option<String>,
    pub print_metrics: bool,
}

impl RuntimeConfig {
    /// Create configuration from environment variables.
    ///
    /// - `SR_BACKEND`: file, memory or rocksdb (default: file)
    /// - `SR_ACTING_USER`: acting user when `--user` is absent
    /// - plus the variables read by `TelemetryConfig`, `RegistryConfig`
    ///   and `StoreConfig`
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend = match env::var("SR_BACKEND") {
            Ok(value) => parse_backend(&value)?,
            Err(_) => Backend::File,
        };
        Ok(Self {
            telemetry: TelemetryConfig::for_subsystem("01", "client-registry"),
            registry: RegistryConfig::from_env(),
            store: StoreConfig::from_env(),
            backend,
            acting_user: env::var("SR_ACTING_USER").ok(),
            print_metrics: false,
        })
    }

    /// Apply command-line overrides.
    pub fn with_cli(mut self, cli: &Cli) -> Result<Self, ConfigError> {
        if let Some(path) = &cli.data_file {
            self.store.data_file = path.clone();
        }
        if let Some(backend) = cli.backend {
            self.backend = backend;
        }
        if let Some(user) = &cli.user {
            self.acting_user = Some(user.clone());
        }
        if cli.json_logs {
            self.telemetry.json_logs = true;
        }
        self.print_metrics |= cli.print_metrics;

        if self.backend == Backend::Rocksdb && !cfg!(feature = "rocksdb") {
            return Err(ConfigError::RocksDbUnavailable);
        }
        Ok(self)
    }
}

fn parse_backend(value: &str) -> Result<Backend, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "file" => Ok(Backend::File),
        "memory" => Ok(Backend::Memory),
        "rocksdb" => Ok(Backend::Rocksdb),
        _ => Err(ConfigError::UnknownBackend(value.to_string())),
    }
}
