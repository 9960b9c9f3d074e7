//! Derives runtime artefact paths for the daemon supervisor.
//!
//! The runtime directory houses the singleton lock, the pid file, and the
//! status snapshot that mirrors every lifecycle status the daemon reports.
//! External tooling reads the same layout to observe a running daemon.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::Config;

#[cfg(unix)]
use dirs::runtime_dir;
#[cfg(unix)]
use libc::geteuid;

/// Canonical paths for runtime artefacts written by the daemon.
#[derive(Debug, Clone)]
pub struct RuntimePaths {
    runtime_dir: PathBuf,
    lock_path: PathBuf,
    pid_path: PathBuf,
    status_path: PathBuf,
}

impl RuntimePaths {
    /// Derives runtime paths from the shared configuration, creating the
    /// runtime directory when it does not exist yet.
    pub fn from_config(config: &Config) -> Result<Self, RuntimePathsError> {
        let name = config.service_name();
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(RuntimePathsError::InvalidServiceName {
                name: name.to_owned(),
            });
        }
        let runtime_dir = match config.runtime_dir() {
            Some(dir) => dir.as_std_path().to_path_buf(),
            None => default_runtime_directory(),
        };
        fs::create_dir_all(&runtime_dir).map_err(|source| RuntimePathsError::RuntimeDirectory {
            path: runtime_dir.clone(),
            source,
        })?;
        Ok(Self {
            lock_path: runtime_dir.join(format!("{name}.lock")),
            pid_path: runtime_dir.join(format!("{name}.pid")),
            status_path: runtime_dir.join(format!("{name}.status")),
            runtime_dir,
        })
    }

    /// Directory holding runtime artefacts.
    pub fn runtime_dir(&self) -> &Path {
        self.runtime_dir.as_path()
    }

    /// Path to the lock file guarding singleton startup.
    pub fn lock_path(&self) -> &Path {
        self.lock_path.as_path()
    }

    /// Path to the PID file.
    pub fn pid_path(&self) -> &Path {
        self.pid_path.as_path()
    }

    /// Path to the status snapshot.
    pub fn status_path(&self) -> &Path {
        self.status_path.as_path()
    }
}

fn default_runtime_directory() -> PathBuf {
    #[cfg(unix)]
    {
        if let Some(mut dir) = runtime_dir() {
            dir.push("vigil");
            return dir;
        }
        let mut dir = env::temp_dir();
        dir.push("vigil");
        dir.push(format!("uid-{}", unsafe { geteuid() }));
        dir
    }

    #[cfg(not(unix))]
    {
        let mut dir = env::temp_dir();
        dir.push("vigil");
        dir
    }
}

/// Errors raised while deriving daemon runtime paths.
#[derive(Debug, Error)]
pub enum RuntimePathsError {
    /// The service name cannot be used as a file name stem.
    #[error("service name '{name}' cannot name runtime files")]
    InvalidServiceName {
        /// Offending service name.
        name: String,
    },
    /// Creating the runtime directory failed.
    #[error("failed to prepare runtime directory '{path}': {source}")]
    RuntimeDirectory {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    #[test]
    fn derives_paths_inside_configured_directory() {
        let temp = TempDir::new().expect("temp dir");
        let dir = Utf8PathBuf::from_path_buf(temp.path().join("run"))
            .expect("temp path should be UTF-8");
        let config = Config {
            service_name: "sampled".to_owned(),
            runtime_dir: Some(dir.clone()),
            ..Config::default()
        };
        let paths = RuntimePaths::from_config(&config).expect("paths should derive");
        assert!(paths.runtime_dir().is_dir(), "runtime dir should be created");
        assert_eq!(paths.lock_path(), dir.join("sampled.lock").as_std_path());
        assert_eq!(paths.pid_path(), dir.join("sampled.pid").as_std_path());
        assert_eq!(paths.status_path(), dir.join("sampled.status").as_std_path());
    }

    #[test]
    fn falls_back_to_default_runtime_directory() {
        let paths = RuntimePaths::from_config(&Config::default()).expect("paths should derive");
        let tail = paths
            .runtime_dir()
            .file_name()
            .and_then(|name| name.to_str())
            .expect("runtime dir should have trailing component");
        assert!(
            tail == "vigil" || tail.starts_with("uid-"),
            "unexpected runtime tail: {tail}"
        );
        assert!(paths.lock_path().ends_with("vigild.lock"));
    }

    #[test]
    fn rejects_service_names_with_separators() {
        let config = Config {
            service_name: "../escape".to_owned(),
            ..Config::default()
        };
        let error = RuntimePaths::from_config(&config)
            .expect_err("paths should fail for names containing separators");
        assert!(matches!(
            error,
            RuntimePathsError::InvalidServiceName { .. }
        ));
    }
}
