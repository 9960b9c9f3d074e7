//! Error surface for daemon launch and supervision.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use nix::errno::Errno;
use thiserror::Error;

use ortho_config::OrthoError;
use vigil_config::RuntimePathsError;

use crate::bootstrap::BootstrapError;
use crate::monitor::MonitorError;
use crate::service::LifecycleError;

use super::control::ControlError;

/// Errors surfaced while launching or supervising the daemon process.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Config {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Configuration or telemetry start-up failed.
    #[error("daemon bootstrap failed: {source}")]
    Bootstrap {
        /// Underlying bootstrap error.
        #[source]
        source: BootstrapError,
    },
    /// Runtime artefact paths could not be derived.
    #[error("failed to prepare runtime paths: {source}")]
    RuntimePaths {
        /// Underlying path error.
        #[source]
        source: RuntimePathsError,
    },
    /// Lock file creation failed.
    #[error("failed to create lock file '{path}': {source}")]
    LockCreate {
        /// Lock file path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// A live daemon already holds the lock.
    #[error("daemon already running with pid {pid}")]
    AlreadyRunning {
        /// PID recorded in the existing pid file.
        pid: u32,
    },
    /// Removing a stale runtime artefact failed.
    #[error("failed to remove stale file '{path}': {source}")]
    Cleanup {
        /// Path of the artefact that could not be removed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Writing the pid file failed.
    #[error("failed to write pid file '{path}': {source}")]
    PidWrite {
        /// PID file path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Checking an existing pid failed.
    #[error("failed to check existing process {pid}: {source}")]
    CheckProcess {
        /// PID whose liveness check failed.
        pid: u32,
        /// Underlying OS error.
        #[source]
        source: Errno,
    },
    /// The control source failed.
    #[error("control source failed: {source}")]
    Control {
        /// Underlying control error.
        #[source]
        source: ControlError,
    },
    /// A lifecycle trigger failed.
    #[error("lifecycle transition failed: {source}")]
    Lifecycle {
        /// Underlying lifecycle error.
        #[source]
        source: LifecycleError,
    },
    /// The sample monitor could not be registered or started.
    #[error("failed to set up monitor: {source}")]
    Monitor {
        /// Underlying monitor error.
        #[source]
        source: MonitorError,
    },
}

impl From<Arc<OrthoError>> for LaunchError {
    fn from(source: Arc<OrthoError>) -> Self {
        Self::Config { source }
    }
}

impl From<BootstrapError> for LaunchError {
    fn from(source: BootstrapError) -> Self {
        match source {
            BootstrapError::Configuration { source } => Self::Config { source },
            other => Self::Bootstrap { source: other },
        }
    }
}

impl From<RuntimePathsError> for LaunchError {
    fn from(source: RuntimePathsError) -> Self {
        Self::RuntimePaths { source }
    }
}

impl From<ControlError> for LaunchError {
    fn from(source: ControlError) -> Self {
        Self::Control { source }
    }
}

impl From<LifecycleError> for LaunchError {
    fn from(source: LifecycleError) -> Self {
        Self::Lifecycle { source }
    }
}

impl From<MonitorError> for LaunchError {
    fn from(source: MonitorError) -> Self {
        Self::Monitor { source }
    }
}
