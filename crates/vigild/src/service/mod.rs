//! Lifecycle core: the service state machine and its monitor registry.
//!
//! [`ServiceCore`] receives control triggers one at a time, reports the
//! pending status, runs the registered [`LifecycleListener`]s, updates its
//! run state, cascades the new state into every registered [`Monitor`], and
//! finally reports the terminal status. Monitors keep their caller-requested
//! state across pauses, so only the physical timers follow the service.

mod error;
mod options;
mod registry;
mod transitions;

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::diagnostics::{DiagnosticSink, TracingDiagnosticSink};
use crate::lifecycle::LifecycleState;
use crate::listener::LifecycleListener;
use crate::monitor::Monitor;
use crate::status::StatusReporter;

pub use error::LifecycleError;
pub use options::ServiceOptions;

pub(crate) const SERVICE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::service");

type Registry<K> = HashMap<K, Arc<Monitor<K>>>;

/// Lifecycle shell coordinating control triggers, listeners, and monitors.
///
/// `K` is the caller's monitor reference type. Share the core behind an
/// [`Arc`] when monitor callbacks or other threads need to reach it.
pub struct ServiceCore<K> {
    options: ServiceOptions,
    reporter: Arc<dyn StatusReporter>,
    diagnostics: Arc<dyn DiagnosticSink>,
    listeners: RwLock<Vec<Arc<dyn LifecycleListener>>>,
    state: RwLock<LifecycleState>,
    started: Arc<AtomicBool>,
    transition: Mutex<()>,
    registry: RwLock<Registry<K>>,
}

impl<K> fmt::Debug for ServiceCore<K> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ServiceCore")
            .field("options", &self.options)
            .field("state", &self.state())
            .field("monitors", &self.registry().len())
            .finish_non_exhaustive()
    }
}

impl<K> ServiceCore<K>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
{
    /// Builds a stopped service reporting through `reporter`.
    ///
    /// Diagnostics go to a [`TracingDiagnosticSink`] named after the service
    /// until [`ServiceCore::with_diagnostics`] replaces it.
    pub fn new(options: ServiceOptions, reporter: Arc<dyn StatusReporter>) -> Self {
        let diagnostics = Arc::new(TracingDiagnosticSink::new(options.service_name.clone()));
        Self {
            options,
            reporter,
            diagnostics,
            listeners: RwLock::new(Vec::new()),
            state: RwLock::new(LifecycleState::Stopped),
            started: Arc::new(AtomicBool::new(false)),
            transition: Mutex::new(()),
            registry: RwLock::new(HashMap::new()),
        }
    }

    /// Replaces the diagnostic sink.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Registers a listener; listeners run in registration order.
    pub fn add_listener<L>(&self, listener: L)
    where
        L: LifecycleListener + 'static,
    {
        self.listeners
            .write()
            .unwrap_or_else(|poison| poison.into_inner())
            .push(Arc::new(listener));
    }
}

impl<K> ServiceCore<K> {
    /// Options this service was built with.
    #[must_use]
    pub const fn options(&self) -> &ServiceOptions {
        &self.options
    }

    /// Whether the service is running.
    #[must_use]
    pub fn started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Current lifecycle state, including pending states mid-transition.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        *self.state.read().unwrap_or_else(|poison| poison.into_inner())
    }

    /// Evicts and disposes every registered monitor. Repeated calls are no-ops.
    pub fn dispose(&self) {
        let monitors: Vec<Arc<Monitor<K>>> = {
            let mut registry = self.registry_mut();
            registry.drain().map(|(_, monitor)| monitor).collect()
        };
        for monitor in monitors {
            monitor.dispose();
        }
    }

    fn set_state(&self, state: LifecycleState) {
        *self
            .state
            .write()
            .unwrap_or_else(|poison| poison.into_inner()) = state;
    }

    fn listeners(&self) -> Vec<Arc<dyn LifecycleListener>> {
        self.listeners
            .read()
            .unwrap_or_else(|poison| poison.into_inner())
            .clone()
    }

    fn registry(&self) -> RwLockReadGuard<'_, Registry<K>> {
        self.registry
            .read()
            .unwrap_or_else(|poison| poison.into_inner())
    }

    fn registry_mut(&self) -> RwLockWriteGuard<'_, Registry<K>> {
        self.registry
            .write()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}

impl<K> Drop for ServiceCore<K> {
    fn drop(&mut self) {
        self.dispose();
    }
}
