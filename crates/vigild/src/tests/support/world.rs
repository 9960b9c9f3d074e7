//! BDD world wrapping a service core, its doubles, and monitor firings.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::diagnostics::NullDiagnosticSink;
use crate::monitor::MonitorError;
use crate::service::{LifecycleError, ServiceCore, ServiceOptions};

use super::listener::RecordingListener;
use super::reporter::RecordingStatusReporter;

type Firings = Arc<Mutex<Vec<String>>>;

/// Scenario world shared across service steps.
pub struct ServiceWorld {
    pub service: ServiceCore<String>,
    pub reporter: Arc<RecordingStatusReporter>,
    pub listener: Arc<RecordingListener>,
    firings: Firings,
    pub lifecycle_result: Option<Result<(), LifecycleError>>,
    pub monitor_result: Option<Result<(), MonitorError>>,
    pub removed: Option<bool>,
}

impl ServiceWorld {
    /// Builds a stopped service with one recording listener.
    pub fn new() -> Self {
        let reporter = Arc::new(RecordingStatusReporter::default());
        let listener = Arc::new(RecordingListener::default());
        let service = ServiceCore::new(ServiceOptions::default(), reporter.clone())
            .with_diagnostics(Arc::new(NullDiagnosticSink));
        service.add_listener(Arc::clone(&listener));
        Self {
            service,
            reporter,
            listener,
            firings: Arc::new(Mutex::new(Vec::new())),
            lifecycle_result: None,
            monitor_result: None,
            removed: None,
        }
    }

    /// Registers a monitor that records its firings.
    pub fn add_monitor(&mut self, reference: &str, interval: Duration) {
        let firings = Arc::clone(&self.firings);
        let result = self
            .service
            .add_monitor(reference.to_owned(), interval, move |reference, _| {
                firings
                    .lock()
                    .expect("firings mutex poisoned")
                    .push(reference.clone());
            })
            .map(drop);
        self.monitor_result = Some(result);
    }

    /// Number of recorded firings for `reference`.
    pub fn firings(&self, reference: &str) -> usize {
        self.firings
            .lock()
            .expect("firings mutex poisoned")
            .iter()
            .filter(|fired| fired.as_str() == reference)
            .count()
    }

    /// Forgets every recorded firing.
    pub fn clear_firings(&self) {
        self.firings.lock().expect("firings mutex poisoned").clear();
    }

    /// Checks that every monitor is armed exactly when requested and running.
    pub fn assert_invariant(&self) {
        let started = self.service.started();
        for reference in self.service.monitor_references() {
            let running = self
                .service
                .is_monitor_running(&reference)
                .expect("registered monitor");
            let armed = self
                .service
                .is_monitor_armed(&reference)
                .expect("registered monitor");
            assert_eq!(
                armed,
                running && started,
                "monitor {reference}: armed={armed} requested={running} started={started}"
            );
        }
    }
}
