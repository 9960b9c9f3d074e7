use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use nix::errno::Errno;
use nix::sys::signal::kill;
use nix::unistd::Pid;
use tracing::{info, warn};

use vigil_config::RuntimePaths;

use super::PROCESS_TARGET;
use super::errors::LaunchError;

/// Singleton lock over a service's runtime directory.
///
/// Holding the guard keeps the lock and pid files in place; dropping it
/// removes them together with the status snapshot.
#[derive(Debug)]
pub(super) struct ProcessGuard {
    paths: RuntimePaths,
    _lock: File,
}

impl ProcessGuard {
    pub(super) fn acquire(paths: RuntimePaths) -> Result<Self, LaunchError> {
        let lock = acquire_lock(&paths)?;
        Ok(Self { paths, _lock: lock })
    }

    pub(super) fn write_pid(&self, pid: u32) -> Result<(), LaunchError> {
        let path = self.paths.pid_path();
        let pid_error = |source| LaunchError::PidWrite {
            path: path.to_path_buf(),
            source,
        };
        let mut file = private_file(OpenOptions::new().write(true).create(true).truncate(true))
            .open(path)
            .map_err(pid_error)?;
        writeln!(file, "{pid}").map_err(pid_error)?;
        file.sync_all().map_err(pid_error)?;
        info!(
            target: PROCESS_TARGET,
            pid,
            file = %path.display(),
            "pid file written"
        );
        Ok(())
    }

    pub(super) const fn paths(&self) -> &RuntimePaths {
        &self.paths
    }
}

impl Drop for ProcessGuard {
    fn drop(&mut self) {
        for path in [
            self.paths.status_path(),
            self.paths.pid_path(),
            self.paths.lock_path(),
        ] {
            if let Err(error) = fs::remove_file(path)
                && error.kind() != io::ErrorKind::NotFound
            {
                warn!(
                    target: PROCESS_TARGET,
                    file = %path.display(),
                    error = %error,
                    "failed to remove runtime artefact"
                );
            }
        }
    }
}

fn private_file(options: &mut OpenOptions) -> &mut OpenOptions {
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
}

fn acquire_lock(paths: &RuntimePaths) -> Result<File, LaunchError> {
    match private_file(OpenOptions::new().write(true).create_new(true)).open(paths.lock_path()) {
        Ok(file) => {
            info!(
                target: PROCESS_TARGET,
                file = %paths.lock_path().display(),
                "acquired service lock"
            );
            Ok(file)
        }
        Err(error) if error.kind() == io::ErrorKind::AlreadyExists => reclaim_stale_lock(paths),
        Err(source) => Err(LaunchError::LockCreate {
            path: paths.lock_path().to_path_buf(),
            source,
        }),
    }
}

fn reclaim_stale_lock(paths: &RuntimePaths) -> Result<File, LaunchError> {
    if let Some(pid) = read_pid(paths.pid_path()) {
        if process_alive(pid)? {
            info!(
                target: PROCESS_TARGET,
                pid,
                "refusing to start: existing daemon alive"
            );
            return Err(LaunchError::AlreadyRunning { pid });
        }
        warn!(
            target: PROCESS_TARGET,
            pid,
            "previous daemon is gone; removing stale runtime files"
        );
    }
    remove_stale(paths.lock_path())?;
    remove_stale(paths.pid_path())?;
    remove_stale(paths.status_path())?;
    // One retry only: a racing launcher that wins the lock keeps it.
    match private_file(OpenOptions::new().write(true).create_new(true)).open(paths.lock_path()) {
        Ok(file) => Ok(file),
        Err(source) => Err(LaunchError::LockCreate {
            path: paths.lock_path().to_path_buf(),
            source,
        }),
    }
}

fn read_pid(path: &Path) -> Option<u32> {
    let content = fs::read_to_string(path).ok()?;
    content.trim().parse::<u32>().ok().filter(|pid| *pid != 0)
}

fn remove_stale(path: &Path) -> Result<(), LaunchError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(LaunchError::Cleanup {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn process_alive(pid: u32) -> Result<bool, LaunchError> {
    let Ok(raw) = i32::try_from(pid) else {
        return Ok(false);
    };
    match kill(Pid::from_raw(raw), None) {
        Ok(()) | Err(Errno::EPERM) => Ok(true),
        Err(Errno::ESRCH) => Ok(false),
        Err(source) => Err(LaunchError::CheckProcess { pid, source }),
    }
}
