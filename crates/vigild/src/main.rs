use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    match vigild::run_daemon() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(target: "vigild::main", error = %error, "daemon exited with an error");
            // Telemetry may not be installed when bootstrap itself failed.
            writeln!(io::stderr().lock(), "vigild: {error}").ok();
            ExitCode::FAILURE
        }
    }
}
