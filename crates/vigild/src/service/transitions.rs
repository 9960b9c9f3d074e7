//! Lifecycle entry points driven by the control layer.

use std::fmt;
use std::hash::Hash;
use std::sync::atomic::Ordering;

use tracing::{info, warn};

use super::{LifecycleError, SERVICE_TARGET, ServiceCore};
use crate::diagnostics::{DiagnosticEntry, EntrySeverity};
use crate::lifecycle::{
    LifecycleState, PowerEventOutcome, PowerStatus, SessionChange, SessionChangeOutcome,
    ShutdownOutcome, Trigger,
};
use crate::listener::{HandlerResult, LifecycleListener};

/// Static description of a run-state transition.
struct Transition {
    trigger: Trigger,
    from: &'static [LifecycleState],
    pending: LifecycleState,
    target: LifecycleState,
    completed: &'static str,
}

const START: Transition = Transition {
    trigger: Trigger::Start,
    from: &[LifecycleState::Stopped],
    pending: LifecycleState::StartPending,
    target: LifecycleState::Running,
    completed: "service started successfully",
};

const PAUSE: Transition = Transition {
    trigger: Trigger::Pause,
    from: &[LifecycleState::Running],
    pending: LifecycleState::PausePending,
    target: LifecycleState::Paused,
    completed: "service paused successfully",
};

const CONTINUE: Transition = Transition {
    trigger: Trigger::Continue,
    from: &[LifecycleState::Paused],
    pending: LifecycleState::ContinuePending,
    target: LifecycleState::Running,
    completed: "service continued successfully",
};

const STOP: Transition = Transition {
    trigger: Trigger::Stop,
    from: &[LifecycleState::Running, LifecycleState::Paused],
    pending: LifecycleState::StopPending,
    target: LifecycleState::Stopped,
    completed: "service stopped successfully",
};

impl<K> ServiceCore<K>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
{
    /// Starts a stopped service and arms every requested monitor.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InvalidTransition`] unless the service is
    /// stopped, or [`LifecycleError::Handler`] when a listener fails; the
    /// service then stays stopped.
    pub fn on_start(&self, args: &[String]) -> Result<(), LifecycleError> {
        self.run_transition(&START, |listener| listener.start_service(args))
    }

    /// Pauses a running service, disarming every monitor.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::NotAccepted`] when pausing is disabled,
    /// [`LifecycleError::InvalidTransition`] unless running, or
    /// [`LifecycleError::Handler`] when a listener fails.
    pub fn on_pause(&self) -> Result<(), LifecycleError> {
        self.run_transition(&PAUSE, |listener| listener.pause_service())
    }

    /// Resumes a paused service and re-arms every requested monitor.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::NotAccepted`] when pausing is disabled,
    /// [`LifecycleError::InvalidTransition`] unless paused, or
    /// [`LifecycleError::Handler`] when a listener fails.
    pub fn on_continue(&self) -> Result<(), LifecycleError> {
        self.run_transition(&CONTINUE, |listener| listener.continue_service())
    }

    /// Stops a running or paused service, disarming every monitor.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InvalidTransition`] unless running or
    /// paused, or [`LifecycleError::Handler`] when a listener fails.
    pub fn on_stop(&self) -> Result<(), LifecycleError> {
        self.run_transition(&STOP, |listener| listener.stop_service())
    }

    /// Delivers an application-defined command code to every listener.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Handler`] when a listener fails.
    pub fn on_custom_command(&self, code: u32) -> Result<(), LifecycleError> {
        self.ensure_accepted(Trigger::CustomCommand)?;
        for listener in self.listeners() {
            listener
                .custom_command(code)
                .map_err(|source| LifecycleError::Handler {
                    trigger: Trigger::CustomCommand,
                    source,
                })?;
        }
        info!(target: SERVICE_TARGET, code, "custom command handled");
        Ok(())
    }

    /// Notifies listeners of a system shutdown.
    ///
    /// The reporter's default shutdown handling runs afterwards unless a
    /// listener asks to skip it. The merged outcome is returned.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::NotAccepted`] when shutdown notifications
    /// are disabled or [`LifecycleError::Handler`] when a listener fails.
    pub fn on_shutdown(&self) -> Result<ShutdownOutcome, LifecycleError> {
        self.ensure_accepted(Trigger::Shutdown)?;
        let mut outcome = ShutdownOutcome::default();
        for listener in self.listeners() {
            let answer = listener
                .shutdown()
                .map_err(|source| LifecycleError::Handler {
                    trigger: Trigger::Shutdown,
                    source,
                })?;
            outcome = outcome.merge(answer);
        }
        if outcome.run_default_handling {
            self.reporter.default_shutdown();
        }
        info!(
            target: SERVICE_TARGET,
            run_default = outcome.run_default_handling,
            "shutdown handled"
        );
        Ok(outcome)
    }

    /// Notifies listeners of a power event and answers it.
    ///
    /// Returns `false` when a listener rejects the event. Otherwise the
    /// reporter's default handling decides, unless every listener skipped it,
    /// in which case the event is granted.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::NotAccepted`] when power events are disabled
    /// or [`LifecycleError::Handler`] when a listener fails.
    pub fn on_power_event(&self, status: PowerStatus) -> Result<bool, LifecycleError> {
        self.ensure_accepted(Trigger::PowerEvent)?;
        let mut outcome = PowerEventOutcome::default();
        for listener in self.listeners() {
            let answer =
                listener
                    .power_event(status)
                    .map_err(|source| LifecycleError::Handler {
                        trigger: Trigger::PowerEvent,
                        source,
                    })?;
            outcome = outcome.merge(answer);
        }
        let granted = if outcome.reject_query {
            false
        } else if outcome.run_default_handling {
            self.reporter.default_power_event(status)
        } else {
            true
        };
        info!(
            target: SERVICE_TARGET,
            power = ?status,
            query = status.is_query(),
            granted,
            "power event handled"
        );
        Ok(granted)
    }

    /// Notifies listeners of a user session change.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::NotAccepted`] when session notifications are
    /// disabled or [`LifecycleError::Handler`] when a listener fails.
    pub fn on_session_change(&self, change: &SessionChange) -> Result<(), LifecycleError> {
        self.ensure_accepted(Trigger::SessionChange)?;
        let mut outcome = SessionChangeOutcome::default();
        for listener in self.listeners() {
            let answer =
                listener
                    .session_change(change)
                    .map_err(|source| LifecycleError::Handler {
                        trigger: Trigger::SessionChange,
                        source,
                    })?;
            outcome = outcome.merge(answer);
        }
        if outcome.run_default_handling {
            self.reporter.default_session_change(change);
        }
        info!(
            target: SERVICE_TARGET,
            reason = ?change.reason,
            session = change.session_id,
            "session change handled"
        );
        Ok(())
    }

    fn ensure_accepted(&self, trigger: Trigger) -> Result<(), LifecycleError> {
        if self.options.accepts(trigger) {
            Ok(())
        } else {
            Err(LifecycleError::NotAccepted { trigger })
        }
    }

    fn run_transition<F>(&self, transition: &Transition, hook: F) -> Result<(), LifecycleError>
    where
        F: Fn(&dyn LifecycleListener) -> HandlerResult,
    {
        self.ensure_accepted(transition.trigger)?;
        let _serialised = self
            .transition
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());
        let prior = self.state();
        if !transition.from.contains(&prior) {
            return Err(LifecycleError::InvalidTransition {
                state: prior,
                trigger: transition.trigger,
            });
        }

        self.set_state(transition.pending);
        self.reporter.report_status(transition.pending.status());

        for listener in self.listeners() {
            if let Err(source) = hook(listener.as_ref()) {
                self.set_state(prior);
                self.reporter.report_status(prior.status());
                let error = LifecycleError::Handler {
                    trigger: transition.trigger,
                    source,
                };
                warn!(
                    target: SERVICE_TARGET,
                    trigger = %transition.trigger,
                    state = %prior,
                    error = %error,
                    "transition aborted"
                );
                if self.options.auto_log {
                    self.diagnostics.write(
                        &DiagnosticEntry::new(format!("failed to {}: {error}", transition.trigger))
                            .with_severity(EntrySeverity::Error),
                    );
                }
                return Err(error);
            }
        }

        let running = transition.target.is_started();
        self.set_state(transition.target);
        self.started.store(running, Ordering::SeqCst);
        self.cascade(running);
        self.reporter.report_status(transition.target.status());

        info!(
            target: SERVICE_TARGET,
            trigger = %transition.trigger,
            state = %transition.target,
            monitors = self.monitor_count(),
            "transition completed"
        );
        if self.options.auto_log {
            self.diagnostics.write_message(transition.completed);
        }
        Ok(())
    }
}
