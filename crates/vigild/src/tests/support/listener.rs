//! Test double for [`LifecycleListener`] with scripted answers.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::lifecycle::{
    PowerEventOutcome, PowerStatus, SessionChange, SessionChangeOutcome, ShutdownOutcome, Trigger,
};
use crate::listener::{HandlerError, HandlerResult, LifecycleListener};

/// Hook invocations observed by the listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerCall {
    /// `start_service` with its arguments.
    Start(Vec<String>),
    /// `pause_service`.
    Pause,
    /// `continue_service`.
    Continue,
    /// `stop_service`.
    Stop,
    /// `custom_command` with its code.
    Custom(u32),
    /// `shutdown`.
    Shutdown,
    /// `power_event` with its status.
    Power(PowerStatus),
    /// `session_change` with its payload.
    Session(SessionChange),
}

#[derive(Debug, Default)]
struct Script {
    failing: Option<Trigger>,
    shutdown: ShutdownOutcome,
    power: PowerEventOutcome,
    session: SessionChangeOutcome,
}

/// Listener that records calls and answers from a script.
#[derive(Debug)]
pub struct RecordingListener {
    name: &'static str,
    calls: Mutex<Vec<ListenerCall>>,
    script: Mutex<Script>,
    journal: Option<Arc<Mutex<Vec<&'static str>>>>,
}

impl Default for RecordingListener {
    fn default() -> Self {
        Self::named("listener")
    }
}

impl RecordingListener {
    /// Builds a listener identified by `name` in shared journals.
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            calls: Mutex::new(Vec::new()),
            script: Mutex::new(Script::default()),
            journal: None,
        }
    }

    /// Appends this listener's name to `journal` on every call.
    pub fn with_journal(mut self, journal: Arc<Mutex<Vec<&'static str>>>) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Every recorded call, oldest first.
    pub fn calls(&self) -> Vec<ListenerCall> {
        self.calls.lock().expect("listener mutex poisoned").clone()
    }

    /// Makes the hook for `trigger` fail.
    pub fn fail_on(&self, trigger: Trigger) {
        self.script().failing = Some(trigger);
    }

    /// Sets the shutdown answer.
    pub fn answer_shutdown(&self, outcome: ShutdownOutcome) {
        self.script().shutdown = outcome;
    }

    /// Sets the power-event answer.
    pub fn answer_power(&self, outcome: PowerEventOutcome) {
        self.script().power = outcome;
    }

    /// Sets the session-change answer.
    pub fn answer_session(&self, outcome: SessionChangeOutcome) {
        self.script().session = outcome;
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().expect("listener script poisoned")
    }

    fn record(&self, trigger: Trigger, call: ListenerCall) -> HandlerResult {
        self.calls.lock().expect("listener mutex poisoned").push(call);
        if let Some(journal) = &self.journal {
            journal.lock().expect("journal poisoned").push(self.name);
        }
        if self.script().failing == Some(trigger) {
            let error: HandlerError = format!("{} refused {trigger}", self.name).into();
            return Err(error);
        }
        Ok(())
    }
}

impl LifecycleListener for RecordingListener {
    fn start_service(&self, args: &[String]) -> HandlerResult {
        self.record(Trigger::Start, ListenerCall::Start(args.to_vec()))
    }

    fn pause_service(&self) -> HandlerResult {
        self.record(Trigger::Pause, ListenerCall::Pause)
    }

    fn continue_service(&self) -> HandlerResult {
        self.record(Trigger::Continue, ListenerCall::Continue)
    }

    fn stop_service(&self) -> HandlerResult {
        self.record(Trigger::Stop, ListenerCall::Stop)
    }

    fn custom_command(&self, code: u32) -> HandlerResult {
        self.record(Trigger::CustomCommand, ListenerCall::Custom(code))
    }

    fn shutdown(&self) -> Result<ShutdownOutcome, HandlerError> {
        self.record(Trigger::Shutdown, ListenerCall::Shutdown)?;
        Ok(self.script().shutdown)
    }

    fn power_event(&self, status: PowerStatus) -> Result<PowerEventOutcome, HandlerError> {
        self.record(Trigger::PowerEvent, ListenerCall::Power(status))?;
        Ok(self.script().power)
    }

    fn session_change(&self, change: &SessionChange) -> Result<SessionChangeOutcome, HandlerError> {
        self.record(Trigger::SessionChange, ListenerCall::Session(*change))?;
        Ok(self.script().session)
    }
}
