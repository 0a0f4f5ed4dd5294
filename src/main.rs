//! Main entry point for the `commit-guard` CLI.

use commit_guard::cli;
use commit_guard::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match cli::run() {
        Ok(code) => code,
        Err(e) => {
            if matches!(e, Error::CommandNotImplemented { .. }) {
                tracing::error!(error = ?e, "Malformed check definition");
            }
            eprintln!("Error: {e}");
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        },
    }
}
