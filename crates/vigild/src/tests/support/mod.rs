//! Shared doubles and helpers for the lifecycle test suites.

mod config_loader;
mod listener;
mod reporter;
mod world;

use std::thread;
use std::time::{Duration, Instant};

pub use config_loader::{FailingConfigLoader, TestConfigLoader};
pub use listener::{ListenerCall, RecordingListener};
pub use reporter::{RecordingStatusReporter, ReportEvent};
pub use world::ServiceWorld;

/// Interval used by monitors in timing-sensitive tests.
pub const TICK: Duration = Duration::from_millis(10);

/// Upper bound for any wait on background activity.
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(2);

/// Polls `condition` until it holds or [`WAIT_TIMEOUT`] elapses.
pub fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + WAIT_TIMEOUT;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}
