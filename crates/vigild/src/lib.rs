//! Lifecycle shell for long-running daemons.
//!
//! [`ServiceCore`] maps control triggers (start, pause, continue, stop,
//! shutdown, power, session change, and custom commands) onto registered
//! [`LifecycleListener`]s, and owns a registry of periodic [`Monitor`]s whose
//! timers follow both the caller's start request and the service run state.
//! A monitor started while the service is paused stays requested but
//! unarmed, and is armed as soon as the service runs again.
//!
//! Transitions report a pending status through the injected
//! [`StatusReporter`] before listeners run and a terminal status once the
//! monitor cascade has settled. Listener failures are never swallowed: they
//! abort the transition and surface as [`LifecycleError::Handler`].
//!
//! The [`process`] module binds the core to Unix signals and runtime files for
//! the `vigild` binary.

mod bootstrap;
mod diagnostics;
mod lifecycle;
mod listener;
mod monitor;
pub mod process;
mod service;
mod status;
mod telemetry;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Daemon, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use diagnostics::{
    DiagnosticEntry, DiagnosticSink, EntrySeverity, NullDiagnosticSink, TracingDiagnosticSink,
};
pub use lifecycle::{
    LifecycleState, PowerEventOutcome, PowerStatus, ServiceStatus, SessionChange,
    SessionChangeOutcome, SessionChangeReason, ShutdownOutcome, Trigger,
};
pub use listener::{HandlerError, HandlerResult, LifecycleListener};
pub use monitor::{Monitor, MonitorCallback, MonitorError};
pub use process::{LaunchError, run_daemon};
pub use service::{LifecycleError, ServiceCore, ServiceOptions};
pub use status::{StatusReporter, StructuredStatusReporter};
pub use telemetry::{TelemetryError, TelemetryHandle, initialise as initialise_telemetry};

#[cfg(test)]
mod tests;
