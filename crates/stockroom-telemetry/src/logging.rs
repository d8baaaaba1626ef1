//! Structured log helpers.
//!
//! Every event carries a `subsystem` field so log aggregation can split the
//! stream per subsystem without parsing messages.

/// Helper to create structured log entries with consistent formatting.
#[macro_export]
macro_rules! log_event {
    (info, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    (warn, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    (error, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    (debug, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a client-related event with standard fields.
#[macro_export]
macro_rules! log_client_event {
    ($level:ident, $subsystem:expr, $msg:expr, $client_id:expr, $acting_user:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            client_id = %$client_id,
            acting_user = %$acting_user,
            $($($field)*,)?
            $msg
        )
    };
}
