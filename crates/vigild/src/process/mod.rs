//! Unix binding of the lifecycle core.
//!
//! Signals become lifecycle triggers, status reports become a JSON snapshot in
//! the runtime directory, and a lock plus pid file keep a single daemon per
//! service name.

mod control;
mod errors;
mod files;
mod guard;
mod launch;
mod reporter;

pub use control::{ControlError, ControlRequest, ControlSource, SignalControlSource};
pub use errors::LaunchError;
pub use launch::run_daemon;
pub use reporter::FileStatusReporter;

#[cfg(test)]
pub(crate) use launch::{LaunchPlan, ProcessControl, ServiceDeps, run_daemon_with};

pub(crate) const PROCESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::process");

/// Custom command delivered on `SIGHUP`.
pub const RELOAD_COMMAND: u32 = 129;

/// Reference of the sample monitor registered by the daemon binary.
pub const HEARTBEAT_MONITOR: &str = "heartbeat";
