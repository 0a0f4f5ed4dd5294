//! Command execution for running checks.
//!
//! Checks never go through a shell: a [`CommandLine`] is a program plus its
//! arguments, so staged paths containing spaces or quotes reach the tool
//! untouched. The rendered form is only used for display.

use crate::core::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::time::timeout;

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    /// Creates a command line with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Returns the program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the arguments.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

/// Quotes a word for display the way a POSIX shell would need it.
fn quote(word: &str) -> String {
    let safe = |c: char| c.is_ascii_alphanumeric() || "_@%+=:,./-".contains(c);
    if !word.is_empty() && word.chars().all(safe) {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// Output from a command execution.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code of the command.
    pub exit_code: i32,
    /// Standard output (empty unless captured).
    pub stdout: String,
    /// Standard error (empty unless captured).
    pub stderr: String,
    /// Whether the command was killed due to timeout.
    pub timed_out: bool,
    /// Duration the command took to run.
    pub duration: Duration,
}

impl CommandOutput {
    /// Returns true if the command succeeded (exit code 0).
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0 && !self.timed_out
    }

}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Working directory for the command.
    pub cwd: Option<PathBuf>,
    /// Timeout for the command. `None` waits forever.
    pub timeout: Option<Duration>,
    /// Whether to capture output (vs streaming to console).
    pub capture_output: bool,
}

impl ExecuteOptions {
    /// Sets the working directory.
    #[must_use]
    pub fn cwd(mut self, path: impl AsRef<Path>) -> Self {
        self.cwd = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub const fn timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout = duration;
        self
    }

    /// Sets whether to capture output.
    #[must_use]
    pub const fn capture_output(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }
}

/// Executor for running external tools.
#[derive(Debug, Default)]
pub struct Executor;

impl Executor {
    /// Creates a new executor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Executes a command and waits for it to finish.
    pub async fn execute(
        &self,
        command: &CommandLine,
        options: &ExecuteOptions,
    ) -> Result<CommandOutput> {
        let start = std::time::Instant::now();

        let mut cmd = Command::new(command.program());
        cmd.args(command.arguments());

        if let Some(ref cwd) = options.cwd {
            cmd.current_dir(cwd);
        }

        cmd.stdin(Stdio::null());
        cmd.kill_on_drop(true);

        if options.capture_output {
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::piped());
        } else {
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::inherit());
        }

        tracing::debug!(command = %command, cwd = ?options.cwd, "Spawning command");

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::CommandNotFound {
                    command: command.program().to_string(),
                }
            } else {
                Error::io(format!("spawn {}", command.program()), e)
            }
        })?;

        let result = if let Some(timeout_duration) = options.timeout {
            match timeout(timeout_duration, wait_for_output(&mut child)).await {
                Ok(result) => result,
                Err(_) => {
                    // Kill the process on timeout - ignore result since we're returning anyway
                    drop(child.kill().await);
                    return Ok(CommandOutput {
                        exit_code: 124,
                        stdout: String::new(),
                        stderr: "Command timed out".to_string(),
                        timed_out: true,
                        duration: start.elapsed(),
                    });
                },
            }
        } else {
            wait_for_output(&mut child).await
        };

        let (exit_code, stdout, stderr) = result?;

        tracing::debug!(
            command = %command,
            exit_code,
            elapsed = ?start.elapsed(),
            "Command finished"
        );

        Ok(CommandOutput {
            exit_code,
            stdout,
            stderr,
            timed_out: false,
            duration: start.elapsed(),
        })
    }

    /// Checks if a command exists in PATH.
    #[must_use]
    pub fn command_exists(command: &str) -> bool {
        which::which(command).is_ok()
    }
}

/// Waits for the child to exit, draining whichever pipes were captured.
async fn wait_for_output(child: &mut tokio::process::Child) -> Result<(i32, String, String)> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (status, stdout, stderr) = tokio::try_join!(
        async { child.wait().await.map_err(|e| Error::io("wait for command", e)) },
        drain(stdout),
        drain(stderr),
    )?;

    // A signal-terminated child has no code; count it as a failure.
    Ok((status.code().unwrap_or(1), stdout, stderr))
}

async fn drain<R: AsyncRead + Unpin>(pipe: Option<R>) -> Result<String> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf)
            .await
            .map_err(|e| Error::io("read command output", e))?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
