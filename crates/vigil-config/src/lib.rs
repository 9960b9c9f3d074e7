//! Shared configuration for the vigil daemon.
//!
//! Values are layered by [`ortho_config`]: built-in defaults first, then the
//! TOML file named by `--config-path` or `VIGIL_CONFIG_PATH`, then `VIGIL_*`
//! environment variables, and finally command-line flags. The resolved
//! [`Config`] drives telemetry, the accepted service controls, and the
//! location of runtime artefacts written by the daemon supervisor.

mod defaults;
mod logging;
mod runtime;

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_HEARTBEAT_INTERVAL_MS, DEFAULT_LOG_FILTER, DEFAULT_SERVICE_NAME,
    default_heartbeat_interval_ms, default_log_filter, default_log_filter_string,
    default_log_format, default_service_name, default_service_name_string,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use runtime::{RuntimePaths, RuntimePathsError};

/// Resolved daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "VIGIL")]
pub struct Config {
    /// Name reported in diagnostics and used for runtime artefact file names.
    #[serde(default = "defaults::default_service_name_string")]
    pub service_name: String,
    /// `tracing` filter expression applied to the global subscriber.
    #[serde(default = "defaults::default_log_filter_string")]
    pub log_filter: String,
    /// Output format for structured logs.
    #[serde(default = "defaults::default_log_format")]
    pub log_format: LogFormat,
    /// Directory for the lock, pid, and status files.
    #[serde(default)]
    pub runtime_dir: Option<Utf8PathBuf>,
    /// Interval between firings of the sample heartbeat monitor.
    #[serde(default = "defaults::default_heartbeat_interval_ms")]
    pub heartbeat_interval_ms: u64,
    /// Whether pause and continue requests are honoured.
    #[serde(default = "defaults::enabled")]
    pub can_pause_and_continue: bool,
    /// Whether system shutdown notifications are honoured.
    #[serde(default = "defaults::enabled")]
    pub can_shutdown: bool,
    /// Whether power events are forwarded to listeners.
    #[serde(default)]
    pub can_handle_power_event: bool,
    /// Whether session-change events are forwarded to listeners.
    #[serde(default)]
    pub can_handle_session_change: bool,
    /// Whether completed lifecycle transitions are written to the diagnostic sink.
    #[serde(default = "defaults::enabled")]
    pub auto_log: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: default_service_name_string(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            runtime_dir: None,
            heartbeat_interval_ms: default_heartbeat_interval_ms(),
            can_pause_and_continue: true,
            can_shutdown: true,
            can_handle_power_event: false,
            can_handle_session_change: false,
            auto_log: true,
        }
    }
}

impl Config {
    /// Service name used for diagnostics and runtime artefacts.
    #[must_use]
    pub const fn service_name(&self) -> &str {
        self.service_name.as_str()
    }

    /// Log filter expression for the tracing subscriber.
    #[must_use]
    pub const fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Output format for structured logs.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Explicit runtime directory, when one was configured.
    #[must_use]
    pub fn runtime_dir(&self) -> Option<&Utf8Path> {
        self.runtime_dir.as_deref()
    }

    /// Interval between heartbeat monitor firings.
    #[must_use]
    pub const fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }
}
