//! Log output formats accepted by the daemon configuration.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How `vigild` renders its tracing events on stderr.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per event, fields flattened.
    #[default]
    Json,
    /// Single-line text for interactive terminals.
    Compact,
}

impl LogFormat {
    /// Whether ANSI colour codes may be written for this format.
    ///
    /// JSON lines stay free of escape sequences even on a terminal.
    #[must_use]
    pub const fn allows_ansi(self, terminal: bool) -> bool {
        match self {
            Self::Json => false,
            Self::Compact => terminal,
        }
    }
}

/// Error returned when a `--log-format` or `VIGIL_LOG_FORMAT` value is unknown.
pub type LogFormatParseError = strum::ParseError;
