//! Errors raised by monitor registration and control.

use std::io;

use thiserror::Error;

/// Errors surfaced by [`crate::Monitor`] and the monitor registry.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// A monitor with the same reference is already registered.
    #[error("monitor {reference} is already registered")]
    Duplicate {
        /// Debug rendering of the offending reference.
        reference: String,
    },
    /// No monitor is registered under the reference.
    #[error("monitor {reference} is not registered")]
    NotFound {
        /// Debug rendering of the missing reference.
        reference: String,
    },
    /// Monitors need a positive interval.
    #[error("monitor {reference} needs a positive interval")]
    ZeroInterval {
        /// Debug rendering of the offending reference.
        reference: String,
    },
    /// The monitor was removed from its registry and can no longer run.
    #[error("monitor {reference} has been disposed")]
    Disposed {
        /// Debug rendering of the disposed reference.
        reference: String,
    },
    /// The timer thread could not be spawned.
    #[error("failed to spawn timer for monitor {reference}: {source}")]
    Spawn {
        /// Debug rendering of the reference being armed.
        reference: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
}

impl MonitorError {
    pub(crate) fn duplicate(reference: &impl std::fmt::Debug) -> Self {
        Self::Duplicate {
            reference: format!("{reference:?}"),
        }
    }

    pub(crate) fn not_found(reference: &impl std::fmt::Debug) -> Self {
        Self::NotFound {
            reference: format!("{reference:?}"),
        }
    }

    pub(crate) fn zero_interval(reference: &impl std::fmt::Debug) -> Self {
        Self::ZeroInterval {
            reference: format!("{reference:?}"),
        }
    }

    pub(crate) fn disposed(reference: &impl std::fmt::Debug) -> Self {
        Self::Disposed {
            reference: format!("{reference:?}"),
        }
    }
}
