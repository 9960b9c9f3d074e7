//! Configuration loaders that keep runtime artefacts inside a temporary
//! directory.

use std::ffi::OsString;
use std::sync::Arc;

use camino::Utf8PathBuf;
use ortho_config::{OrthoConfig, OrthoError};
use tempfile::TempDir;
use vigil_config::{Config, LogFormat, RuntimePaths};

use crate::bootstrap::ConfigLoader;

/// Loader whose runtime directory lives under a private temporary directory.
#[derive(Debug, Clone)]
pub struct TestConfigLoader {
    runtime: Arc<TempDir>,
    service_name: String,
}

impl TestConfigLoader {
    /// Builds a loader for a uniquely named throwaway runtime directory.
    pub fn new() -> Self {
        Self {
            runtime: Arc::new(TempDir::new().expect("create runtime directory")),
            service_name: "vigild-test".to_owned(),
        }
    }

    /// Configuration this loader hands out.
    pub fn config(&self) -> Config {
        let runtime_dir = Utf8PathBuf::from_path_buf(self.runtime.path().to_path_buf())
            .expect("temporary directory should be UTF-8");
        Config {
            service_name: self.service_name.clone(),
            log_filter: "info".to_owned(),
            log_format: LogFormat::Compact,
            runtime_dir: Some(runtime_dir),
            heartbeat_interval_ms: 50,
            ..Config::default()
        }
    }

    /// Runtime paths derived from [`TestConfigLoader::config`].
    pub fn paths(&self) -> RuntimePaths {
        RuntimePaths::from_config(&self.config()).expect("derive runtime paths")
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config())
    }
}

/// Loader that fails by passing an invalid heartbeat interval on the CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let args = vec![
            OsString::from("vigild"),
            OsString::from("--heartbeat-interval-ms"),
            OsString::from("often"),
        ];
        Config::load_from_iter(args)
    }
}
