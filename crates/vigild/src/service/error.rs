//! Errors raised by lifecycle entry points.

use thiserror::Error;

use crate::lifecycle::{LifecycleState, Trigger};
use crate::listener::HandlerError;

/// Errors returned to the control layer by [`crate::ServiceCore`] triggers.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The service options do not accept this trigger.
    #[error("service does not accept {trigger} requests")]
    NotAccepted {
        /// Rejected trigger.
        trigger: Trigger,
    },
    /// The trigger is not valid from the current state.
    #[error("cannot {trigger} while {state}")]
    InvalidTransition {
        /// State at the time of the request.
        state: LifecycleState,
        /// Rejected trigger.
        trigger: Trigger,
    },
    /// A lifecycle listener failed.
    #[error("{trigger} listener failed: {source}")]
    Handler {
        /// Trigger whose listener failed.
        trigger: Trigger,
        /// Error raised by the listener.
        #[source]
        source: HandlerError,
    },
}
