//! Lifecycle states, reported status codes, and the event payloads exchanged
//! with lifecycle listeners.

use std::fmt;

use serde::Serialize;

/// Internal run state of a [`crate::ServiceCore`].
///
/// The `*Pending` values exist only while a transition is in flight. Monitors
/// and listeners observe the derived `started` flag instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecycleState {
    /// Not running; the initial state.
    #[default]
    Stopped,
    /// Start requested, listeners running.
    StartPending,
    /// Running; monitors with a start request are armed.
    Running,
    /// Pause requested, listeners running.
    PausePending,
    /// Paused; every monitor is disarmed.
    Paused,
    /// Continue requested, listeners running.
    ContinuePending,
    /// Stop requested, listeners running.
    StopPending,
}

impl LifecycleState {
    /// Whether the daemon counts as started in this state.
    #[must_use]
    pub const fn is_started(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Status code reported to the control layer for this state.
    #[must_use]
    pub const fn status(self) -> ServiceStatus {
        match self {
            Self::Stopped => ServiceStatus::Stopped,
            Self::StartPending => ServiceStatus::StartPending,
            Self::Running => ServiceStatus::Running,
            Self::PausePending => ServiceStatus::PausePending,
            Self::Paused => ServiceStatus::Paused,
            Self::ContinuePending => ServiceStatus::ContinuePending,
            Self::StopPending => ServiceStatus::StopPending,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.status(), formatter)
    }
}

/// Status codes reported to the control layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    /// The service is not running.
    Stopped,
    /// The service is starting.
    StartPending,
    /// The service is stopping.
    StopPending,
    /// The service is running.
    Running,
    /// The service is resuming from a pause.
    ContinuePending,
    /// The service is pausing.
    PausePending,
    /// The service is paused.
    Paused,
}

impl ServiceStatus {
    /// Stable lowercase label used in logs and status snapshots.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::StartPending => "start_pending",
            Self::StopPending => "stop_pending",
            Self::Running => "running",
            Self::ContinuePending => "continue_pending",
            Self::PausePending => "pause_pending",
            Self::Paused => "paused",
        }
    }

    /// Whether this status marks an in-flight transition.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(
            self,
            Self::StartPending | Self::StopPending | Self::ContinuePending | Self::PausePending
        )
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Control requests delivered by the control layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Start the service.
    Start,
    /// Pause a running service.
    Pause,
    /// Resume a paused service.
    Continue,
    /// Stop a running or paused service.
    Stop,
    /// The system is shutting down.
    Shutdown,
    /// The power state changed.
    PowerEvent,
    /// A user session changed.
    SessionChange,
    /// An application-defined command code.
    CustomCommand,
}

impl fmt::Display for Trigger {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Continue => "continue",
            Self::Stop => "stop",
            Self::Shutdown => "shutdown",
            Self::PowerEvent => "power_event",
            Self::SessionChange => "session_change",
            Self::CustomCommand => "custom_command",
        };
        formatter.write_str(label)
    }
}

/// Power broadcast delivered with a power event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerStatus {
    /// Battery power is low.
    BatteryLow,
    /// An OEM-defined power event occurred.
    OemEvent,
    /// The power source or battery level changed.
    PowerStatusChange,
    /// The system asks permission to suspend; listeners may reject it.
    QuerySuspend,
    /// A suspend request was denied.
    QuerySuspendFailed,
    /// The system resumed automatically.
    ResumeAutomatic,
    /// The system resumed after a critical suspension.
    ResumeCritical,
    /// The system resumed after a user-initiated suspension.
    ResumeSuspend,
    /// The system is about to suspend.
    Suspend,
}

impl PowerStatus {
    /// Whether the control layer expects an accept/reject answer.
    #[must_use]
    pub const fn is_query(self) -> bool {
        matches!(self, Self::QuerySuspend)
    }
}

/// Reason attached to a session-change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionChangeReason {
    /// A session connected to the console.
    ConsoleConnect,
    /// A session disconnected from the console.
    ConsoleDisconnect,
    /// A session connected remotely.
    RemoteConnect,
    /// A session disconnected remotely.
    RemoteDisconnect,
    /// A user logged on.
    SessionLogon,
    /// A user logged off.
    SessionLogoff,
    /// A session was locked.
    SessionLock,
    /// A session was unlocked.
    SessionUnlock,
    /// The remote-control status of a session changed.
    SessionRemoteControl,
}

/// Session-change notification payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionChange {
    /// Why the session changed.
    pub reason: SessionChangeReason,
    /// Identifier of the affected session.
    pub session_id: u32,
}

impl SessionChange {
    /// Builds a session-change description.
    #[must_use]
    pub const fn new(reason: SessionChangeReason, session_id: u32) -> Self {
        Self { reason, session_id }
    }
}

/// Listener answer to a shutdown notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownOutcome {
    /// Run the control layer's default shutdown handling afterwards.
    pub run_default_handling: bool,
}

impl Default for ShutdownOutcome {
    fn default() -> Self {
        Self {
            run_default_handling: true,
        }
    }
}

impl ShutdownOutcome {
    /// Outcome that suppresses the default shutdown handling.
    #[must_use]
    pub const fn skip_default() -> Self {
        Self {
            run_default_handling: false,
        }
    }

    pub(crate) const fn merge(self, other: Self) -> Self {
        Self {
            run_default_handling: self.run_default_handling && other.run_default_handling,
        }
    }
}

/// Listener answer to a power event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerEventOutcome {
    /// Run the control layer's default power handling afterwards.
    pub run_default_handling: bool,
    /// Reject a [`PowerStatus::QuerySuspend`] request.
    pub reject_query: bool,
}

impl Default for PowerEventOutcome {
    fn default() -> Self {
        Self {
            run_default_handling: true,
            reject_query: false,
        }
    }
}

impl PowerEventOutcome {
    /// Outcome that rejects a pending power query.
    #[must_use]
    pub const fn reject() -> Self {
        Self {
            run_default_handling: true,
            reject_query: true,
        }
    }

    pub(crate) const fn merge(self, other: Self) -> Self {
        Self {
            run_default_handling: self.run_default_handling && other.run_default_handling,
            reject_query: self.reject_query || other.reject_query,
        }
    }
}

/// Listener answer to a session-change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionChangeOutcome {
    /// Run the control layer's default session handling afterwards.
    pub run_default_handling: bool,
}

impl Default for SessionChangeOutcome {
    fn default() -> Self {
        Self {
            run_default_handling: true,
        }
    }
}

impl SessionChangeOutcome {
    pub(crate) const fn merge(self, other: Self) -> Self {
        Self {
            run_default_handling: self.run_default_handling && other.run_default_handling,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(LifecycleState::Stopped, false)]
    #[case(LifecycleState::StartPending, false)]
    #[case(LifecycleState::Running, true)]
    #[case(LifecycleState::PausePending, false)]
    #[case(LifecycleState::Paused, false)]
    #[case(LifecycleState::ContinuePending, false)]
    #[case(LifecycleState::StopPending, false)]
    fn only_running_counts_as_started(#[case] state: LifecycleState, #[case] started: bool) {
        assert_eq!(state.is_started(), started);
        assert_eq!(state.status().is_pending(), state.status().as_str().ends_with("_pending"));
    }

    #[rstest]
    fn outcomes_default_to_running_base_behaviour() {
        assert!(ShutdownOutcome::default().run_default_handling);
        assert!(SessionChangeOutcome::default().run_default_handling);
        let power = PowerEventOutcome::default();
        assert!(power.run_default_handling);
        assert!(!power.reject_query);
    }

    #[rstest]
    fn merged_power_outcomes_reject_when_any_listener_rejects() {
        let merged = PowerEventOutcome::default().merge(PowerEventOutcome::reject());
        assert!(merged.reject_query);
        assert!(merged.run_default_handling);
    }

    #[rstest]
    fn merged_shutdown_outcomes_skip_default_when_any_listener_skips() {
        let merged = ShutdownOutcome::default().merge(ShutdownOutcome::skip_default());
        assert!(!merged.run_default_handling);
    }

    #[rstest]
    fn outcomes_and_states_evaluate_in_const_context() {
        const SKIPPED: ShutdownOutcome =
            ShutdownOutcome::skip_default().merge(ShutdownOutcome::skip_default());
        const REJECTED: PowerEventOutcome = PowerEventOutcome::reject();
        const LOGON: SessionChange = SessionChange::new(SessionChangeReason::ConsoleConnect, 7);
        const RUNNING: bool = LifecycleState::Running.is_started();
        const PENDING: bool = LifecycleState::StopPending.status().is_pending();

        assert!(!SKIPPED.run_default_handling);
        assert!(REJECTED.reject_query);
        assert_eq!(LOGON.session_id, 7);
        assert!(RUNNING);
        assert!(PENDING);
    }

    #[rstest]
    fn status_serialises_as_snake_case() {
        let json = serde_json::to_string(&ServiceStatus::ContinuePending).expect("serialise");
        assert_eq!(json, "\"continue_pending\"");
    }
}
