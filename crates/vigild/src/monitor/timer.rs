//! Dedicated timer thread backing an armed monitor.

use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use time::OffsetDateTime;
use tracing::{debug, error};

use super::{MONITOR_TARGET, MonitorCallback};

/// Handle to a ticking timer thread.
///
/// Dropping the stop sender wakes the thread and ends its loop once any
/// in-flight callback returns.
#[derive(Debug)]
pub(crate) struct TimerHandle {
    stop: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl TimerHandle {
    pub(crate) fn spawn<K>(
        reference: K,
        interval: Duration,
        callback: MonitorCallback<K>,
    ) -> io::Result<Self>
    where
        K: std::fmt::Debug + Send + 'static,
    {
        let (stop, stopped) = mpsc::channel();
        let thread = thread::Builder::new()
            .name("vigil-monitor".to_owned())
            .spawn(move || run_timer(&reference, interval, &callback, &stopped))?;
        Ok(Self {
            stop: Some(stop),
            thread: Some(thread),
        })
    }

    /// Whether the timer thread is still ticking.
    pub(crate) fn is_live(&self) -> bool {
        self.stop.is_some()
            && self
                .thread
                .as_ref()
                .is_some_and(|thread| !thread.is_finished())
    }

    /// Stops the timer and waits for an in-flight callback to return.
    ///
    /// A callback that disarms its own monitor cannot wait for itself; the
    /// thread then exits as soon as that callback returns.
    pub(crate) fn disarm(mut self) {
        drop(self.stop.take());
        let Some(thread) = self.thread.take() else {
            return;
        };
        if thread.thread().id() == thread::current().id() {
            return;
        }
        if thread.join().is_err() {
            error!(
                target: MONITOR_TARGET,
                "monitor callback panicked; timer thread terminated"
            );
        }
    }
}

fn run_timer<K>(
    reference: &K,
    interval: Duration,
    callback: &MonitorCallback<K>,
    stopped: &Receiver<()>,
) where
    K: std::fmt::Debug,
{
    debug!(
        target: MONITOR_TARGET,
        reference = ?reference,
        interval_ms = interval.as_millis(),
        "monitor timer armed"
    );
    let mut deadline = Instant::now().checked_add(interval);
    loop {
        match wait_for_stop(stopped, deadline) {
            Err(RecvTimeoutError::Timeout) => {
                callback(reference, OffsetDateTime::now_utc());
                deadline = deadline.and_then(|previous| next_deadline(previous, interval));
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    debug!(
        target: MONITOR_TARGET,
        reference = ?reference,
        "monitor timer disarmed"
    );
}

/// Blocks until the deadline passes or the handle is disarmed.
///
/// A deadline beyond the range of [`Instant`] never elapses.
fn wait_for_stop(stopped: &Receiver<()>, deadline: Option<Instant>) -> Result<(), RecvTimeoutError> {
    match deadline {
        Some(at) => stopped.recv_timeout(at.saturating_duration_since(Instant::now())),
        None => stopped.recv().map_err(|_| RecvTimeoutError::Disconnected),
    }
}

fn next_deadline(previous: Instant, interval: Duration) -> Option<Instant> {
    let now = Instant::now();
    match previous.checked_add(interval) {
        Some(next) if next >= now => Some(next),
        // Missed ticks are dropped rather than replayed in a burst.
        _ => now.checked_add(interval),
    }
}
