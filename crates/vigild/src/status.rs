//! Status reporting seam between the lifecycle core and the control layer.

use std::sync::Arc;

use crate::lifecycle::{PowerStatus, ServiceStatus, SessionChange};

const STATUS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::status");

/// Capability through which [`crate::ServiceCore`] talks back to the control
/// layer that drives it.
///
/// `report_status` acknowledges every pending and terminal status. The
/// `default_*` hooks run the control layer's own handling for an event when
/// listeners leave `run_default_handling` set.
pub trait StatusReporter: Send + Sync {
    /// Publishes the current service status.
    fn report_status(&self, status: ServiceStatus);

    /// Default handling for a system shutdown.
    fn default_shutdown(&self) {}

    /// Default handling for a power event; returns whether a query is granted.
    fn default_power_event(&self, status: PowerStatus) -> bool {
        let _ = status;
        true
    }

    /// Default handling for a session change.
    fn default_session_change(&self, change: &SessionChange) {
        let _ = change;
    }
}

impl<T> StatusReporter for Arc<T>
where
    T: StatusReporter + ?Sized,
{
    fn report_status(&self, status: ServiceStatus) {
        (**self).report_status(status);
    }

    fn default_shutdown(&self) {
        (**self).default_shutdown();
    }

    fn default_power_event(&self, status: PowerStatus) -> bool {
        (**self).default_power_event(status)
    }

    fn default_session_change(&self, change: &SessionChange) {
        (**self).default_session_change(change);
    }
}

/// Reporter that records status changes using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredStatusReporter;

impl StructuredStatusReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl StatusReporter for StructuredStatusReporter {
    fn report_status(&self, status: ServiceStatus) {
        tracing::info!(
            target: STATUS_TARGET,
            event = "status_reported",
            status = %status,
            pending = status.is_pending(),
            "service status reported"
        );
    }

    fn default_shutdown(&self) {
        tracing::info!(
            target: STATUS_TARGET,
            event = "default_shutdown",
            "running default shutdown handling"
        );
    }

    fn default_power_event(&self, status: PowerStatus) -> bool {
        tracing::info!(
            target: STATUS_TARGET,
            event = "default_power_event",
            power = ?status,
            "running default power handling"
        );
        true
    }

    fn default_session_change(&self, change: &SessionChange) {
        tracing::info!(
            target: STATUS_TARGET,
            event = "default_session_change",
            reason = ?change.reason,
            session = change.session_id,
            "running default session handling"
        );
    }
}
