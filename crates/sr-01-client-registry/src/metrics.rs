//! # Client Registry Metrics
//!
//! Prometheus metrics for the registry operations and the optimistic
//! transaction loop underneath them.
//!
//! ## Usage
//!
//! Enabled by the default `metrics` feature. Without it every recording
//! function compiles to a no-op.
//!
//! ## Metrics Exported
//!
//! - `client_registry_operations_total` - Operations by name and outcome
//! - `client_registry_clients_created_total` - Client IDs allocated
//! - `client_registry_operation_duration_seconds` - Operation latency
//! - `client_registry_transaction_attempts` - Commit attempts per transaction
//! - `client_registry_transaction_conflicts_total` - Attempts discarded on conflict

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_histogram, register_histogram_vec, register_int_counter, register_int_counter_vec,
    Histogram, HistogramVec, IntCounter, IntCounterVec,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Operations, labeled by operation name and outcome (`ok` or error kind)
    pub static ref OPERATIONS: IntCounterVec = register_int_counter_vec!(
        "client_registry_operations_total",
        "Total number of registry operations by outcome",
        &["operation", "outcome"]
    )
    .expect("Failed to create OPERATIONS metric");

    /// Client IDs allocated
    pub static ref CLIENTS_CREATED: IntCounter = register_int_counter!(
        "client_registry_clients_created_total",
        "Total number of client IDs allocated"
    )
    .expect("Failed to create CLIENTS_CREATED metric");

    /// Operation latency, labeled by operation name
    pub static ref OPERATION_DURATION: HistogramVec = register_histogram_vec!(
        "client_registry_operation_duration_seconds",
        "Registry operation latency in seconds",
        &["operation"]
    )
    .expect("Failed to create OPERATION_DURATION metric");

    /// Commit attempts needed per committed transaction
    pub static ref TRANSACTION_ATTEMPTS: Histogram = register_histogram!(
        "client_registry_transaction_attempts",
        "Commit attempts per committed transaction",
        vec![1.0, 2.0, 3.0, 5.0, 8.0, 13.0, 21.0, 34.0, 64.0]
    )
    .expect("Failed to create TRANSACTION_ATTEMPTS metric");

    /// Attempts discarded because a read was invalidated
    pub static ref TRANSACTION_CONFLICTS: IntCounter = register_int_counter!(
        "client_registry_transaction_conflicts_total",
        "Total number of transaction attempts discarded on conflict"
    )
    .expect("Failed to create TRANSACTION_CONFLICTS metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record an operation outcome
#[cfg(feature = "metrics")]
pub fn record_operation(operation: &str, outcome: &str) {
    OPERATIONS.with_label_values(&[operation, outcome]).inc();
}

/// Record a client ID allocation
#[cfg(feature = "metrics")]
pub fn record_client_created() {
    CLIENTS_CREATED.inc();
}

/// Record the attempts a committed transaction needed
#[cfg(feature = "metrics")]
pub fn record_transaction_attempts(attempts: u32) {
    TRANSACTION_ATTEMPTS.observe(f64::from(attempts));
}

/// Record a discarded attempt
#[cfg(feature = "metrics")]
pub fn record_transaction_conflict() {
    TRANSACTION_CONFLICTS.inc();
}

/// Latency guard; observes on drop.
#[cfg(feature = "metrics")]
pub struct OperationTimer(#[allow(dead_code)] stockroom_telemetry::HistogramTimer);

/// Start timing an operation
#[cfg(feature = "metrics")]
pub fn start_operation_timer(operation: &str) -> OperationTimer {
    OperationTimer(stockroom_telemetry::time_histogram!(
        OPERATION_DURATION.with_label_values(&[operation])
    ))
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_operation(_operation: &str, _outcome: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_client_created() {}

#[cfg(not(feature = "metrics"))]
pub fn record_transaction_attempts(_attempts: u32) {}

#[cfg(not(feature = "metrics"))]
pub fn record_transaction_conflict() {}

#[cfg(not(feature = "metrics"))]
pub struct OperationTimer;

#[cfg(not(feature = "metrics"))]
pub fn start_operation_timer(_operation: &str) -> OperationTimer {
    OperationTimer
}
