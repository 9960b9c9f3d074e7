//! Periodic monitors whose timers follow both the caller's start request and
//! the owning service's run state.
//!
//! A monitor keeps two pieces of state under one lock: the *requested* flag
//! set by [`Monitor::start`] and [`Monitor::stop`], and the *armed* timer
//! thread. The timer only ticks while the monitor is requested and the owning
//! [`crate::ServiceCore`] is running. Service transitions toggle the timer
//! without touching the request, so a pause followed by a continue restores
//! exactly the monitors the caller asked for.

mod error;
mod timer;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use time::OffsetDateTime;
use tracing::{debug, error};

pub use error::MonitorError;
pub(crate) use timer::TimerHandle;

pub(crate) const MONITOR_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::monitor");

/// Callback invoked on every firing with the monitor reference and the firing
/// time.
///
/// Panics are not caught: they terminate the monitor's timer thread and are
/// reported when the timer is next disarmed.
pub type MonitorCallback<K> = Arc<dyn Fn(&K, OffsetDateTime) + Send + Sync>;

#[derive(Debug, Default)]
struct MonitorState {
    requested: bool,
    timer: Option<TimerHandle>,
    disposed: bool,
}

/// Independently startable periodic timer bound to a callback.
pub struct Monitor<K> {
    reference: K,
    interval: Duration,
    callback: MonitorCallback<K>,
    started: Arc<AtomicBool>,
    state: Mutex<MonitorState>,
}

impl<K> fmt::Debug for Monitor<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        formatter
            .debug_struct("Monitor")
            .field("reference", &self.reference)
            .field("interval", &self.interval)
            .field("requested", &state.requested)
            .field("armed", &state.timer.is_some())
            .field("disposed", &state.disposed)
            .finish_non_exhaustive()
    }
}

impl<K> Monitor<K>
where
    K: Clone + fmt::Debug + Send + Sync + 'static,
{
    /// Builds an unarmed, unrequested monitor tied to the service run flag.
    pub(crate) fn new(
        reference: K,
        interval: Duration,
        callback: MonitorCallback<K>,
        started: Arc<AtomicBool>,
    ) -> Self {
        Self {
            reference,
            interval,
            callback,
            started,
            state: Mutex::new(MonitorState::default()),
        }
    }

    /// Requests the monitor to run.
    ///
    /// The timer arms immediately when the owning service is running and is
    /// otherwise deferred until the service next starts or continues.
    pub fn start(&self) -> Result<(), MonitorError> {
        let mut state = self.state();
        if state.disposed {
            return Err(MonitorError::disposed(&self.reference));
        }
        state.requested = true;
        if self.started.load(Ordering::SeqCst) {
            self.rearm(&mut state)?;
        }
        Ok(())
    }

    /// Withdraws the run request and disarms the timer.
    pub fn stop(&self) -> Result<(), MonitorError> {
        let timer = {
            let mut state = self.state();
            if state.disposed {
                return Err(MonitorError::disposed(&self.reference));
            }
            state.requested = false;
            state.timer.take()
        };
        if let Some(timer) = timer {
            timer.disarm();
        }
        Ok(())
    }

    /// Arms the timer when requested, leaving the request untouched.
    pub(crate) fn resume_from_service(&self) {
        let mut state = self.state();
        if state.disposed || !state.requested {
            return;
        }
        if let Err(error) = self.rearm(&mut state) {
            error!(
                target: MONITOR_TARGET,
                reference = ?self.reference,
                error = %error,
                "failed to re-arm monitor"
            );
        }
    }

    /// Takes the timer out without touching the request.
    ///
    /// The caller disarms the returned handle once it has released any locks
    /// a callback might need.
    pub(crate) fn suspend_from_service(&self) -> Option<TimerHandle> {
        self.state().timer.take()
    }

    /// Ensures a live timer, replacing one whose thread died in a callback.
    fn rearm(&self, state: &mut MonitorState) -> Result<(), MonitorError> {
        if state.timer.as_ref().is_some_and(TimerHandle::is_live) {
            return Ok(());
        }
        if let Some(dead) = state.timer.take() {
            dead.disarm();
        }
        state.timer = Some(self.spawn_timer()?);
        Ok(())
    }

    fn spawn_timer(&self) -> Result<TimerHandle, MonitorError> {
        TimerHandle::spawn(
            self.reference.clone(),
            self.interval,
            Arc::clone(&self.callback),
        )
        .map_err(|source| MonitorError::Spawn {
            reference: format!("{:?}", self.reference),
            source,
        })
    }
}

impl<K> Monitor<K> {
    /// Reference the monitor was registered under.
    #[must_use]
    pub const fn reference(&self) -> &K {
        &self.reference
    }

    /// Interval between firings.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether the caller has requested the monitor to run.
    ///
    /// This reflects intent and stays `true` while the service is paused.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state().requested
    }

    /// Whether the timer is physically ticking.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.state().timer.as_ref().is_some_and(TimerHandle::is_live)
    }

    /// Whether the monitor has been disposed.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.state().disposed
    }

    /// Stops the timer and prevents further use. Repeated calls are no-ops.
    pub fn dispose(&self) {
        let timer = {
            let mut state = self.state();
            if state.disposed {
                return;
            }
            state.disposed = true;
            state.timer.take()
        };
        if let Some(timer) = timer {
            timer.disarm();
        }
        debug!(target: MONITOR_TARGET, "monitor disposed");
    }

    fn state(&self) -> MutexGuard<'_, MonitorState> {
        // A panic while holding the lock cannot leave the flags inconsistent.
        self.state
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}

impl<K> Drop for Monitor<K> {
    fn drop(&mut self) {
        let timer = self.state().timer.take();
        if let Some(timer) = timer {
            timer.disarm();
        }
    }
}
