//! Monitor registry operations on [`ServiceCore`].

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use time::OffsetDateTime;
use tracing::debug;

use super::{SERVICE_TARGET, ServiceCore};
use crate::monitor::{Monitor, MonitorCallback, MonitorError, TimerHandle};

impl<K> ServiceCore<K>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
{
    /// Registers a monitor under `reference`.
    ///
    /// The new monitor is neither requested nor armed until the caller starts
    /// it. An existing registration is never replaced.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Duplicate`] when `reference` is already
    /// registered and [`MonitorError::ZeroInterval`] for a zero interval.
    pub fn add_monitor<F>(
        &self,
        reference: K,
        interval: Duration,
        callback: F,
    ) -> Result<Arc<Monitor<K>>, MonitorError>
    where
        F: Fn(&K, OffsetDateTime) + Send + Sync + 'static,
    {
        if interval.is_zero() {
            return Err(MonitorError::zero_interval(&reference));
        }
        let mut registry = self.registry_mut();
        if registry.contains_key(&reference) {
            return Err(MonitorError::duplicate(&reference));
        }
        let callback: MonitorCallback<K> = Arc::new(callback);
        let monitor = Arc::new(Monitor::new(
            reference.clone(),
            interval,
            callback,
            Arc::clone(&self.started),
        ));
        registry.insert(reference, Arc::clone(&monitor));
        debug!(
            target: SERVICE_TARGET,
            reference = ?monitor.reference(),
            interval_ms = interval.as_millis(),
            "monitor registered"
        );
        Ok(monitor)
    }

    /// Evicts and disposes the monitor under `reference`.
    ///
    /// Removing an unknown reference succeeds without side effects. Returns
    /// whether a monitor was evicted.
    pub fn remove_monitor(&self, reference: &K) -> bool {
        let removed = self.registry_mut().remove(reference);
        let Some(monitor) = removed else {
            return false;
        };
        monitor.dispose();
        debug!(
            target: SERVICE_TARGET,
            reference = ?reference,
            "monitor removed"
        );
        true
    }

    /// Looks up the monitor registered under `reference`.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::NotFound`] when nothing is registered.
    pub fn get_monitor(&self, reference: &K) -> Result<Arc<Monitor<K>>, MonitorError> {
        self.registry()
            .get(reference)
            .cloned()
            .ok_or_else(|| MonitorError::not_found(reference))
    }

    /// Requests the monitor under `reference` to run.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::NotFound`] for an unknown reference or the
    /// error raised while arming the timer.
    pub fn start_monitor(&self, reference: &K) -> Result<(), MonitorError> {
        self.get_monitor(reference)?.start()
    }

    /// Withdraws the run request of the monitor under `reference`.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::NotFound`] for an unknown reference.
    pub fn stop_monitor(&self, reference: &K) -> Result<(), MonitorError> {
        self.get_monitor(reference)?.stop()
    }

    /// Whether the monitor under `reference` has been requested to run.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::NotFound`] for an unknown reference.
    pub fn is_monitor_running(&self, reference: &K) -> Result<bool, MonitorError> {
        Ok(self.get_monitor(reference)?.is_running())
    }

    /// Whether the timer of the monitor under `reference` is ticking.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::NotFound`] for an unknown reference.
    pub fn is_monitor_armed(&self, reference: &K) -> Result<bool, MonitorError> {
        Ok(self.get_monitor(reference)?.is_armed())
    }

    /// References of every registered monitor, in no particular order.
    #[must_use]
    pub fn monitor_references(&self) -> Vec<K> {
        self.registry().keys().cloned().collect()
    }

    /// Number of registered monitors.
    #[must_use]
    pub fn monitor_count(&self) -> usize {
        self.registry().len()
    }

    /// Applies the service run state to every registered monitor.
    ///
    /// The `started` flag must already hold `running` so that concurrent
    /// [`Monitor::start`] calls agree with the cascade.
    pub(crate) fn cascade(&self, running: bool) {
        debug_assert_eq!(self.started.load(Ordering::SeqCst), running);
        if running {
            for monitor in self.registry().values() {
                monitor.resume_from_service();
            }
            return;
        }
        let timers: Vec<TimerHandle> = self
            .registry()
            .values()
            .filter_map(|monitor| monitor.suspend_from_service())
            .collect();
        // Joined outside the registry lock so callbacks may use the registry.
        for timer in timers {
            timer.disarm();
        }
    }
}
