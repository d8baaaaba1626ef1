//! # Stockroom Telemetry
//!
//! Logging and metrics plumbing shared by the Stockroom binaries.
//!
//! ## Components
//!
//! - **Tracing**: global `tracing-subscriber` registry with env filter and
//!   pretty or JSON output
//! - **Metrics**: Prometheus text rendering of the default registry
//! - **Log macros**: `log_event!` / `log_client_event!` with a consistent
//!   `subsystem` field
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockroom_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_telemetry(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `stockroom` | Service name in logs |
//! | `SR_LOG_LEVEL` | `info` | Log level filter |
//! | `SR_JSON_LOGS` | `false` | JSON log output |
//! | `SR_CONSOLE_OUTPUT` | `true` | Write logs to stderr |
//! | `SR_SUBSYSTEM_ID` | `00` | Subsystem identifier |

mod config;
mod logging;
mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{encode_metrics, HistogramTimer};
pub use tracing_setup::{build_env_filter, init_tracing};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Failed to encode Prometheus metrics: {0}")]
    MetricsEncode(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging for the process.
///
/// Metrics need no initialization: collectors register themselves in the
/// default registry on first use.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    init_tracing(config)?;
    tracing::info!(
        service = %config.full_service_name(),
        environment = %config.environment,
        "Telemetry initialized"
    );
    Ok(())
}

/// Info-level span carrying the `subsystem` field.
///
/// ```rust,ignore
/// let _span = subsystem_span!("create_client", "client-registry", acting_user = %user).entered();
/// ```
#[macro_export]
macro_rules! subsystem_span {
    ($name:expr, $subsystem:expr) => {
        tracing::info_span!($name, subsystem = $subsystem)
    };
    ($name:expr, $subsystem:expr, $($field:tt)+) => {
        tracing::info_span!($name, subsystem = $subsystem, $($field)+)
    };
}
