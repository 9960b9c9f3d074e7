//! Controls a service instance accepts and its diagnostic identity.

use vigil_config::{Config, default_service_name_string};

use crate::lifecycle::Trigger;

/// Accepted controls and diagnostic behaviour for a [`crate::ServiceCore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOptions {
    /// Name used as the diagnostic source.
    pub service_name: String,
    /// Accept pause and continue requests.
    pub can_pause_and_continue: bool,
    /// Accept system shutdown notifications.
    pub can_shutdown: bool,
    /// Accept power events.
    pub can_handle_power_event: bool,
    /// Accept session-change notifications.
    pub can_handle_session_change: bool,
    /// Write completed transitions to the diagnostic sink.
    pub auto_log: bool,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            service_name: default_service_name_string(),
            can_pause_and_continue: true,
            can_shutdown: true,
            can_handle_power_event: false,
            can_handle_session_change: false,
            auto_log: true,
        }
    }
}

impl ServiceOptions {
    /// Derives options from the resolved daemon configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            service_name: config.service_name().to_owned(),
            can_pause_and_continue: config.can_pause_and_continue,
            can_shutdown: config.can_shutdown,
            can_handle_power_event: config.can_handle_power_event,
            can_handle_session_change: config.can_handle_session_change,
            auto_log: config.auto_log,
        }
    }

    /// Whether the trigger is accepted under these options.
    #[must_use]
    pub const fn accepts(&self, trigger: Trigger) -> bool {
        match trigger {
            Trigger::Start | Trigger::Stop | Trigger::CustomCommand => true,
            Trigger::Pause | Trigger::Continue => self.can_pause_and_continue,
            Trigger::Shutdown => self.can_shutdown,
            Trigger::PowerEvent => self.can_handle_power_event,
            Trigger::SessionChange => self.can_handle_session_change,
        }
    }
}
