use std::io;

use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM, SIGUSR1, SIGUSR2};
use signal_hook::iterator::Signals;
use thiserror::Error;
use tracing::{debug, info};

use super::{PROCESS_TARGET, RELOAD_COMMAND};

/// Control request decoded from the operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRequest {
    /// Stop the service and leave the control loop.
    Stop,
    /// The system is shutting down.
    Shutdown,
    /// Pause the service.
    Pause,
    /// Resume the service.
    Continue,
    /// Application-defined command code.
    Custom(u32),
}

/// Errors reported by control sources.
#[derive(Debug, Error)]
pub enum ControlError {
    /// Installing signal handlers failed.
    #[error("failed to install signal handlers: {source}")]
    Install {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Blocking source of control requests.
pub trait ControlSource: Send {
    /// Waits for the next request; `None` once the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError`] when the source cannot deliver requests.
    fn next_request(&mut self) -> Result<Option<ControlRequest>, ControlError>;
}

/// Control source fed by Unix signals.
///
/// | Signal | Request |
/// |---|---|
/// | `SIGTERM`, `SIGINT` | [`ControlRequest::Stop`] |
/// | `SIGQUIT` | [`ControlRequest::Shutdown`] |
/// | `SIGUSR1` | [`ControlRequest::Pause`] |
/// | `SIGUSR2` | [`ControlRequest::Continue`] |
/// | `SIGHUP` | [`ControlRequest::Custom`] with [`RELOAD_COMMAND`] |
pub struct SignalControlSource {
    signals: Signals,
}

impl std::fmt::Debug for SignalControlSource {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.debug_struct("SignalControlSource").finish_non_exhaustive()
    }
}

impl SignalControlSource {
    /// Installs handlers for every mapped signal.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Install`] when registration fails.
    pub fn install() -> Result<Self, ControlError> {
        let signals = Signals::new([SIGTERM, SIGINT, SIGQUIT, SIGUSR1, SIGUSR2, SIGHUP])
            .map_err(|source| ControlError::Install { source })?;
        debug!(target: PROCESS_TARGET, "signal handlers installed");
        Ok(Self { signals })
    }
}

impl ControlSource for SignalControlSource {
    fn next_request(&mut self) -> Result<Option<ControlRequest>, ControlError> {
        for signal in self.signals.forever() {
            if let Some(request) = request_for_signal(signal) {
                info!(
                    target: PROCESS_TARGET,
                    signal,
                    request = ?request,
                    "control signal received"
                );
                return Ok(Some(request));
            }
        }
        Ok(None)
    }
}

fn request_for_signal(signal: i32) -> Option<ControlRequest> {
    match signal {
        SIGTERM | SIGINT => Some(ControlRequest::Stop),
        SIGQUIT => Some(ControlRequest::Shutdown),
        SIGUSR1 => Some(ControlRequest::Pause),
        SIGUSR2 => Some(ControlRequest::Continue),
        SIGHUP => Some(ControlRequest::Custom(RELOAD_COMMAND)),
        _ => None,
    }
}
