//! Launch sequencing and the signal-driven control loop.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use vigil_config::RuntimePaths;

use crate::bootstrap::{ConfigLoader, SystemConfigLoader, bootstrap_with};
use crate::lifecycle::LifecycleState;
use crate::listener::LifecycleListener;
use crate::service::{LifecycleError, ServiceCore};
use crate::status::StatusReporter;

use super::control::{ControlRequest, ControlSource, SignalControlSource};
use super::errors::LaunchError;
use super::guard::ProcessGuard;
use super::reporter::FileStatusReporter;
use super::{HEARTBEAT_MONITOR, PROCESS_TARGET};

type DaemonService = ServiceCore<&'static str>;

/// Process-level collaborators delivering control requests.
pub(crate) struct ProcessControl<C> {
    pub(crate) control: C,
    pub(crate) pid: u32,
}

/// Service-level collaborators and start arguments.
pub(crate) struct ServiceDeps<L> {
    pub(crate) loader: L,
    pub(crate) listeners: Vec<Arc<dyn LifecycleListener>>,
    pub(crate) args: Vec<String>,
}

/// Collaborators required to run the daemon.
pub(crate) struct LaunchPlan<L, C> {
    pub(crate) process: ProcessControl<C>,
    pub(crate) services: ServiceDeps<L>,
}

/// Runs the daemon in the foreground, driven by Unix signals.
///
/// # Errors
///
/// Returns [`LaunchError`] when start-up fails, another daemon holds the
/// service lock, or a lifecycle listener fails.
pub fn run_daemon() -> Result<(), LaunchError> {
    let control = SignalControlSource::install()?;
    run_daemon_with(LaunchPlan {
        process: ProcessControl {
            control,
            pid: std::process::id(),
        },
        services: ServiceDeps {
            loader: SystemConfigLoader,
            listeners: Vec::new(),
            args: Vec::new(),
        },
    })
}

/// Runs the daemon with injected collaborators.
pub(crate) fn run_daemon_with<L, C>(plan: LaunchPlan<L, C>) -> Result<(), LaunchError>
where
    L: ConfigLoader,
    C: ControlSource,
{
    let LaunchPlan { process, services } = plan;
    let ProcessControl { mut control, pid } = process;
    let ServiceDeps {
        loader,
        listeners,
        args,
    } = services;

    let daemon = bootstrap_with(&loader)?;
    let paths = RuntimePaths::from_config(daemon.config())?;
    let guard = ProcessGuard::acquire(paths)?;
    guard.write_pid(pid)?;

    let reporter = Arc::new(FileStatusReporter::new(guard.paths().status_path(), pid));
    let service: DaemonService = daemon.service(Arc::clone(&reporter) as Arc<dyn StatusReporter>);
    for listener in listeners {
        service.add_listener(listener);
    }
    register_heartbeat(&service, daemon.config().heartbeat_interval())?;

    info!(
        target: PROCESS_TARGET,
        service = daemon.config().service_name(),
        pid,
        "starting service"
    );
    let outcome = serve(&service, &reporter, &mut control, &args);
    let stopped = stop_if_started(&service);
    service.dispose();
    info!(target: PROCESS_TARGET, "shutdown sequence completed");
    outcome.and(stopped)
}

fn register_heartbeat(service: &DaemonService, interval: Duration) -> Result<(), LaunchError> {
    service.add_monitor(HEARTBEAT_MONITOR, interval, |reference, fired_at| {
        info!(
            target: PROCESS_TARGET,
            monitor = *reference,
            fired_at = %fired_at,
            "heartbeat"
        );
    })?;
    service.start_monitor(&HEARTBEAT_MONITOR)?;
    Ok(())
}

fn serve<C>(
    service: &DaemonService,
    reporter: &FileStatusReporter,
    control: &mut C,
    args: &[String],
) -> Result<(), LaunchError>
where
    C: ControlSource,
{
    service.on_start(args)?;
    while let Some(request) = control.next_request()? {
        match request {
            ControlRequest::Stop => break,
            ControlRequest::Shutdown => {
                tolerate_rejection(service.on_shutdown().map(drop))?;
                if reporter.shutdown_requested() {
                    break;
                }
            }
            ControlRequest::Pause => tolerate_rejection(service.on_pause())?,
            ControlRequest::Continue => tolerate_rejection(service.on_continue())?,
            ControlRequest::Custom(code) => {
                tolerate_rejection(service.on_custom_command(code))?;
            }
        }
    }
    Ok(())
}

fn stop_if_started(service: &DaemonService) -> Result<(), LaunchError> {
    match service.state() {
        LifecycleState::Running | LifecycleState::Paused => Ok(service.on_stop()?),
        _ => Ok(()),
    }
}

/// Keeps the loop alive for requests the service declines; listener
/// failures still end the run.
fn tolerate_rejection(result: Result<(), LifecycleError>) -> Result<(), LaunchError> {
    match result {
        Err(
            error @ (LifecycleError::NotAccepted { .. }
            | LifecycleError::InvalidTransition { .. }),
        ) => {
            warn!(
                target: PROCESS_TARGET,
                error = %error,
                "control request ignored"
            );
            Ok(())
        }
        other => Ok(other?),
    }
}
