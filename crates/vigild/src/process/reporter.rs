use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::lifecycle::{PowerStatus, ServiceStatus, SessionChange};
use crate::status::StatusReporter;

use super::PROCESS_TARGET;
use super::files::write_json_atomically;

#[derive(Debug, Serialize)]
struct StatusSnapshot {
    status: ServiceStatus,
    pid: u32,
    timestamp: i64,
}

/// Reporter that persists every status as a JSON snapshot file.
///
/// Its default shutdown handling asks the control loop to stop the service.
#[derive(Debug)]
pub struct FileStatusReporter {
    path: PathBuf,
    pid: u32,
    shutdown_requested: AtomicBool,
}

impl FileStatusReporter {
    /// Builds a reporter writing to `path` on behalf of process `pid`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, pid: u32) -> Self {
        Self {
            path: path.into(),
            pid,
            shutdown_requested: AtomicBool::new(false),
        }
    }

    /// Snapshot location.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Whether default shutdown handling has run.
    #[must_use]
    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }
}

impl StatusReporter for FileStatusReporter {
    fn report_status(&self, status: ServiceStatus) {
        let snapshot = StatusSnapshot {
            status,
            pid: self.pid,
            timestamp: OffsetDateTime::now_utc().unix_timestamp(),
        };
        match write_json_atomically(&self.path, &snapshot) {
            Ok(()) => info!(
                target: PROCESS_TARGET,
                status = %status,
                file = %self.path.display(),
                "status snapshot updated"
            ),
            // Status delivery must not interrupt a transition.
            Err(error) => warn!(
                target: PROCESS_TARGET,
                status = %status,
                file = %self.path.display(),
                error = %error,
                "failed to write status snapshot"
            ),
        }
    }

    fn default_shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::SeqCst);
        info!(
            target: PROCESS_TARGET,
            "system shutdown: service will stop"
        );
    }

    fn default_power_event(&self, status: PowerStatus) -> bool {
        info!(
            target: PROCESS_TARGET,
            power = ?status,
            "power event granted"
        );
        true
    }

    fn default_session_change(&self, change: &SessionChange) {
        info!(
            target: PROCESS_TARGET,
            reason = ?change.reason,
            session = change.session_id,
            "session change observed"
        );
    }
}
