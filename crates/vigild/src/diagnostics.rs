//! Diagnostic sink for operator-facing service log entries.
//!
//! Sinks are infallible from the caller's point of view: a sink that cannot
//! deliver an entry deals with the failure itself so lifecycle processing is
//! never interrupted by logging problems.

use std::fmt;
use std::sync::Arc;

use tracing::{error, info, warn};

const DIAGNOSTICS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::diagnostics");

/// Severity of a diagnostic entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntrySeverity {
    /// A failure the operator should act upon.
    Error,
    /// A condition that may need attention.
    Warning,
    /// Routine information.
    #[default]
    Information,
    /// A successful audited operation.
    SuccessAudit,
    /// A failed audited operation.
    FailureAudit,
}

impl fmt::Display for EntrySeverity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Information => "information",
            Self::SuccessAudit => "success_audit",
            Self::FailureAudit => "failure_audit",
        };
        formatter.write_str(label)
    }
}

/// Fully specified diagnostic entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiagnosticEntry {
    /// Human-readable message.
    pub message: String,
    /// Entry severity.
    pub severity: EntrySeverity,
    /// Application-defined category.
    pub category: u16,
    /// Application-defined event identifier.
    pub event_id: u32,
    /// Optional binary payload attached to the entry.
    pub payload: Option<Vec<u8>>,
}

impl DiagnosticEntry {
    /// Builds an informational entry with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Sets the severity.
    #[must_use]
    pub const fn with_severity(mut self, severity: EntrySeverity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the event identifier.
    #[must_use]
    pub const fn with_event_id(mut self, event_id: u32) -> Self {
        self.event_id = event_id;
        self
    }

    /// Sets the category.
    #[must_use]
    pub const fn with_category(mut self, category: u16) -> Self {
        self.category = category;
        self
    }

    /// Attaches a binary payload.
    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = Some(payload.into());
        self
    }
}

/// Destination for diagnostic entries.
pub trait DiagnosticSink: Send + Sync {
    /// Writes a fully specified entry.
    fn write(&self, entry: &DiagnosticEntry);

    /// Writes a plain informational message.
    fn write_message(&self, message: &str) {
        self.write(&DiagnosticEntry::new(message));
    }
}

impl<T> DiagnosticSink for Arc<T>
where
    T: DiagnosticSink + ?Sized,
{
    fn write(&self, entry: &DiagnosticEntry) {
        (**self).write(entry);
    }

    fn write_message(&self, message: &str) {
        (**self).write_message(message);
    }
}

/// Sink that forwards entries to `tracing` under the service name.
#[derive(Debug, Clone)]
pub struct TracingDiagnosticSink {
    source: String,
}

impl TracingDiagnosticSink {
    /// Builds a sink that tags entries with `source`.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Source name attached to every entry.
    #[must_use]
    pub const fn source(&self) -> &str {
        self.source.as_str()
    }
}

impl DiagnosticSink for TracingDiagnosticSink {
    fn write(&self, entry: &DiagnosticEntry) {
        let payload_len = entry.payload.as_ref().map_or(0, Vec::len);
        match entry.severity {
            EntrySeverity::Error | EntrySeverity::FailureAudit => error!(
                target: DIAGNOSTICS_TARGET,
                source = %self.source,
                severity = %entry.severity,
                category = entry.category,
                event_id = entry.event_id,
                payload_len,
                "{}",
                entry.message
            ),
            EntrySeverity::Warning => warn!(
                target: DIAGNOSTICS_TARGET,
                source = %self.source,
                severity = %entry.severity,
                category = entry.category,
                event_id = entry.event_id,
                payload_len,
                "{}",
                entry.message
            ),
            EntrySeverity::Information | EntrySeverity::SuccessAudit => info!(
                target: DIAGNOSTICS_TARGET,
                source = %self.source,
                severity = %entry.severity,
                category = entry.category,
                event_id = entry.event_id,
                payload_len,
                "{}",
                entry.message
            ),
        }
    }
}

/// Sink that discards every entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDiagnosticSink;

impl DiagnosticSink for NullDiagnosticSink {
    fn write(&self, _entry: &DiagnosticEntry) {}
}
