//! Configuration loading and telemetry start-up ahead of the service loop.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use thiserror::Error;
use tracing::info;

use vigil_config::Config;

use crate::service::{ServiceCore, ServiceOptions};
use crate::status::StatusReporter;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};

const BOOTSTRAP_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::bootstrap");

/// Source of the daemon configuration.
pub trait ConfigLoader: Send + Sync {
    /// Loads the daemon configuration.
    ///
    /// # Errors
    ///
    /// Returns the loader's error when no valid configuration is available.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that layers defaults, file, environment, and CLI via [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader that hands out a pre-resolved configuration.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps a resolved configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
}

/// Configuration and telemetry resolved for one daemon run.
#[derive(Debug)]
pub struct Daemon {
    config: Config,
    telemetry: TelemetryHandle,
}

impl Daemon {
    /// Resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Telemetry handle, mostly of interest to tests.
    #[must_use]
    pub const fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// Builds a stopped service core honouring the configured controls.
    #[must_use]
    pub fn service<K>(&self, reporter: Arc<dyn StatusReporter>) -> ServiceCore<K>
    where
        K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
    {
        ServiceCore::new(ServiceOptions::from_config(&self.config), reporter)
    }
}

/// Loads configuration and installs telemetry.
///
/// # Errors
///
/// Returns [`BootstrapError`] when either step fails.
pub fn bootstrap_with(loader: &dyn ConfigLoader) -> Result<Daemon, BootstrapError> {
    let config = loader
        .load()
        .map_err(|source| BootstrapError::Configuration { source })?;
    let telemetry =
        telemetry::initialise(&config).map_err(|source| BootstrapError::Telemetry { source })?;
    info!(
        target: BOOTSTRAP_TARGET,
        service = config.service_name(),
        format = %telemetry.format(),
        "bootstrap completed"
    );
    Ok(Daemon { config, telemetry })
}
