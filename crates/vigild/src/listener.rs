//! Business-logic hooks invoked by [`crate::ServiceCore`] during lifecycle
//! transitions.

use std::sync::Arc;

use crate::lifecycle::{
    PowerEventOutcome, PowerStatus, SessionChange, SessionChangeOutcome, ShutdownOutcome,
};

/// Error raised by a listener hook.
///
/// The core never recovers from it: the error is returned to the control
/// layer that delivered the trigger.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Result returned by listener hooks without an outcome.
pub type HandlerResult = Result<(), HandlerError>;

/// Observer of daemon lifecycle transitions.
///
/// Every hook has a no-op default so implementors only override the events
/// they care about. Hooks run synchronously on the control thread while the
/// pending status is reported; they must not issue lifecycle triggers on the
/// same [`crate::ServiceCore`].
pub trait LifecycleListener: Send + Sync {
    /// Invoked while the service starts, with the start arguments.
    fn start_service(&self, args: &[String]) -> HandlerResult {
        let _ = args;
        Ok(())
    }

    /// Invoked while a running service pauses.
    fn pause_service(&self) -> HandlerResult {
        Ok(())
    }

    /// Invoked while a paused service resumes.
    fn continue_service(&self) -> HandlerResult {
        Ok(())
    }

    /// Invoked while the service stops.
    fn stop_service(&self) -> HandlerResult {
        Ok(())
    }

    /// Invoked for application-defined command codes.
    fn custom_command(&self, code: u32) -> HandlerResult {
        let _ = code;
        Ok(())
    }

    /// Invoked when the system shuts down.
    fn shutdown(&self) -> Result<ShutdownOutcome, HandlerError> {
        Ok(ShutdownOutcome::default())
    }

    /// Invoked when the power state changes.
    fn power_event(&self, status: PowerStatus) -> Result<PowerEventOutcome, HandlerError> {
        let _ = status;
        Ok(PowerEventOutcome::default())
    }

    /// Invoked when a user session changes.
    fn session_change(&self, change: &SessionChange) -> Result<SessionChangeOutcome, HandlerError> {
        let _ = change;
        Ok(SessionChangeOutcome::default())
    }
}

impl<T> LifecycleListener for Arc<T>
where
    T: LifecycleListener + ?Sized,
{
    fn start_service(&self, args: &[String]) -> HandlerResult {
        (**self).start_service(args)
    }

    fn pause_service(&self) -> HandlerResult {
        (**self).pause_service()
    }

    fn continue_service(&self) -> HandlerResult {
        (**self).continue_service()
    }

    fn stop_service(&self) -> HandlerResult {
        (**self).stop_service()
    }

    fn custom_command(&self, code: u32) -> HandlerResult {
        (**self).custom_command(code)
    }

    fn shutdown(&self) -> Result<ShutdownOutcome, HandlerError> {
        (**self).shutdown()
    }

    fn power_event(&self, status: PowerStatus) -> Result<PowerEventOutcome, HandlerError> {
        (**self).power_event(status)
    }

    fn session_change(&self, change: &SessionChange) -> Result<SessionChangeOutcome, HandlerError> {
        (**self).session_change(change)
    }
}
