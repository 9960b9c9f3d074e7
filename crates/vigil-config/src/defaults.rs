//! Built-in defaults applied when no layer supplies a value.

use crate::logging::LogFormat;

/// Service name used for runtime artefacts and diagnostics.
pub const DEFAULT_SERVICE_NAME: &str = "vigild";

/// Default log filter expression used by the daemon.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default interval between heartbeat monitor firings.
pub const DEFAULT_HEARTBEAT_INTERVAL_MS: u64 = 60_000;

/// Default service name.
pub const fn default_service_name() -> &'static str {
    DEFAULT_SERVICE_NAME
}

/// Owned service name used where allocation is required (e.g. serde).
pub fn default_service_name_string() -> String {
    DEFAULT_SERVICE_NAME.to_owned()
}

/// Default log filter expression used by the daemon.
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the daemon.
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Default heartbeat interval in milliseconds.
pub const fn default_heartbeat_interval_ms() -> u64 {
    DEFAULT_HEARTBEAT_INTERVAL_MS
}

pub(crate) const fn enabled() -> bool {
    true
}
