//! Test double for [`StatusReporter`] that records every interaction.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::lifecycle::{PowerStatus, ServiceStatus, SessionChange};
use crate::status::StatusReporter;

/// Interactions observed by the recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    /// A status report.
    Status(ServiceStatus),
    /// Default shutdown handling ran.
    DefaultShutdown,
    /// Default power handling ran.
    DefaultPowerEvent(PowerStatus),
    /// Default session handling ran.
    DefaultSessionChange(SessionChange),
}

/// Records status reports and default-handling calls for assertions.
#[derive(Debug)]
pub struct RecordingStatusReporter {
    events: Mutex<Vec<ReportEvent>>,
    grant_power: AtomicBool,
}

impl Default for RecordingStatusReporter {
    fn default() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            grant_power: AtomicBool::new(true),
        }
    }
}

impl RecordingStatusReporter {
    /// Copy of every recorded event.
    pub fn events(&self) -> Vec<ReportEvent> {
        self.events
            .lock()
            .expect("reporter mutex poisoned")
            .clone()
    }

    /// Recorded status reports only.
    pub fn statuses(&self) -> Vec<ServiceStatus> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ReportEvent::Status(status) => Some(status),
                _ => None,
            })
            .collect()
    }

    /// Forgets every recorded event.
    pub fn clear(&self) {
        self.events.lock().expect("reporter mutex poisoned").clear();
    }

    /// Sets the answer given by default power handling.
    pub fn grant_power_events(&self, grant: bool) {
        self.grant_power.store(grant, Ordering::SeqCst);
    }

    fn record(&self, event: ReportEvent) {
        self.events
            .lock()
            .expect("reporter mutex poisoned")
            .push(event);
    }
}

impl StatusReporter for RecordingStatusReporter {
    fn report_status(&self, status: ServiceStatus) {
        self.record(ReportEvent::Status(status));
    }

    fn default_shutdown(&self) {
        self.record(ReportEvent::DefaultShutdown);
    }

    fn default_power_event(&self, status: PowerStatus) -> bool {
        self.record(ReportEvent::DefaultPowerEvent(status));
        self.grant_power.load(Ordering::SeqCst)
    }

    fn default_session_change(&self, change: &SessionChange) {
        self.record(ReportEvent::DefaultSessionChange(*change));
    }
}
