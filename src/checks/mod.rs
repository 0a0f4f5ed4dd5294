//! The check contract and its built-in implementations.
//!
//! Every check follows the same protocol, driven by [`check`]:
//!
//! 1. [`Check::before_run`] narrows the file list.
//! 2. A banner names the check and the command it is about to run.
//! 3. With no relevant files the check is skipped; otherwise
//!    [`Check::run_command`] executes and [`Check::succeeded`] judges it.
//! 4. A failure becomes the error from [`Check::report_failure`], which the
//!    runner propagates without running anything else.
//! 5. [`Check::after_run`] cleans up.

pub mod builtin;
pub mod keywords;
pub mod lint;

use crate::core::error::{Error, Result};
use crate::core::executor::{CommandLine, CommandOutput, ExecuteOptions, Executor};
use crate::core::runner::CheckResult;
use console::style;
use std::path::PathBuf;
use std::time::Duration;

pub use builtin::CheckKind;
pub use keywords::KeywordCheck;
pub use lint::LintCheck;

/// Everything a check needs to run its command.
#[derive(Debug, Default)]
pub struct Context {
    /// Executor used for external tools.
    pub executor: Executor,
    /// Directory the commands run in (the repository root).
    pub cwd: Option<PathBuf>,
    /// Per-command timeout.
    pub timeout: Option<Duration>,
}

impl Context {
    /// Returns execution options for a command, streaming or captured.
    #[must_use]
    pub fn options(&self, capture_output: bool) -> ExecuteOptions {
        let mut options = ExecuteOptions::default()
            .timeout(self.timeout)
            .capture_output(capture_output);
        if let Some(ref cwd) = self.cwd {
            options = options.cwd(cwd);
        }
        options
    }
}

/// A quality check run against the staged change set.
///
/// Implementors must provide [`Check::command`]; the default exists only to
/// turn a forgotten override into [`Error::CommandNotImplemented`].
#[allow(async_fn_in_trait)]
pub trait Check {
    /// Name shown in the banner.
    fn name(&self) -> &str;

    /// The (possibly narrowed) files this check runs against.
    fn files(&self) -> &[String];

    /// Narrows the file list. Defaults to the full staged list.
    fn before_run(&mut self) {}

    /// Builds the command to run against [`Check::files`].
    fn command(&self) -> Result<CommandLine> {
        Err(Error::CommandNotImplemented {
            check: self.name().to_string(),
        })
    }

    /// Executes the command, streaming its output to the terminal.
    async fn run_command(&self, command: &CommandLine, ctx: &Context) -> Result<CommandOutput> {
        ctx.executor.execute(command, &ctx.options(false)).await
    }

    /// Decides whether the command's outcome means the check passed.
    fn succeeded(&self, output: &CommandOutput) -> bool {
        output.success()
    }

    /// Builds the error that aborts the commit.
    fn report_failure(&self, output: &CommandOutput) -> Error;

    /// Cleanup once the check has passed or been skipped.
    fn after_run(&mut self) {}
}

/// Runs one check through the full protocol.
///
/// Returns the check's result when it passed or was skipped, and the
/// check's failure error otherwise.
pub async fn check<C: Check>(check: &mut C, ctx: &Context) -> Result<CheckResult> {
    check.before_run();

    let command = check.command()?;
    eprintln!(
        "Running {}: {command}",
        style(format!("{}#check", check.name())).bold().blue()
    );

    if check.files().is_empty() {
        eprintln!(
            "Diff does not contain relevant files. {}",
            style("[SKIPPED]").yellow()
        );
        tracing::debug!(check = check.name(), "Skipped, no relevant files");
        check.after_run();
        return Ok(CheckResult::skipped(check.name().to_string()));
    }

    let output = check.run_command(&command, ctx).await?;

    if output.timed_out {
        return Err(Error::CheckTimeout {
            name: check.name().to_string(),
            timeout: ctx
                .timeout
                .map(|t| humantime::format_duration(t).to_string())
                .unwrap_or_default(),
        });
    }

    if !check.succeeded(&output) {
        tracing::debug!(
            check = check.name(),
            exit_code = output.exit_code,
            "Check failed"
        );
        return Err(check.report_failure(&output));
    }

    check.after_run();
    Ok(CheckResult::passed(check.name().to_string(), output))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A check that never overrides `command`.
    struct BareCheck {
        files: Vec<String>,
    }

    impl Check for BareCheck {
        fn name(&self) -> &str {
            "BareCheck"
        }

        fn files(&self) -> &[String] {
            &self.files
        }

        fn report_failure(&self, _output: &CommandOutput) -> Error {
            Error::check_failed(self.name(), "bare check failed", None)
        }
    }

    /// A check running `sh -c <script>` that records its hook calls.
    struct ScriptCheck {
        script: &'static str,
        files: Vec<String>,
        narrow_to_nothing: bool,
        after_run_called: bool,
    }

    impl ScriptCheck {
        fn new(script: &'static str) -> Self {
            Self {
                script,
                files: vec!["app.rb".to_string()],
                narrow_to_nothing: false,
                after_run_called: false,
            }
        }
    }

    impl Check for ScriptCheck {
        fn name(&self) -> &str {
            "ScriptCheck"
        }

        fn files(&self) -> &[String] {
            &self.files
        }

        fn before_run(&mut self) {
            if self.narrow_to_nothing {
                self.files.clear();
            }
        }

        fn command(&self) -> Result<CommandLine> {
            Ok(CommandLine::new("sh").arg("-c").arg(self.script))
        }

        fn report_failure(&self, output: &CommandOutput) -> Error {
            Error::check_failed(self.name(), "script failed", Some(output.exit_code))
        }

        fn after_run(&mut self) {
            self.after_run_called = true;
        }
    }

    #[tokio::test]
    async fn test_missing_command_is_contract_violation() {
        let mut bare = BareCheck {
            files: vec!["app.rb".to_string()],
        };
        let result = check(&mut bare, &Context::default()).await;
        assert!(matches!(
            result,
            Err(Error::CommandNotImplemented { check }) if check == "BareCheck"
        ));
    }

    #[tokio::test]
    async fn test_missing_command_fails_even_without_files() {
        let mut bare = BareCheck { files: Vec::new() };
        let result = check(&mut bare, &Context::default()).await;
        assert!(matches!(result, Err(Error::CommandNotImplemented { .. })));
    }

    #[tokio::test]
    async fn test_passing_check() {
        let mut script = ScriptCheck::new("exit 0");
        let result = check(&mut script, &Context::default())
            .await
            .expect("check should pass");

        assert!(result.passed);
        assert!(!result.skipped);
        assert!(script.after_run_called);
    }

    #[tokio::test]
    async fn test_failing_check_reports_failure() {
        let mut script = ScriptCheck::new("exit 7");
        let result = check(&mut script, &Context::default()).await;

        assert!(matches!(
            result,
            Err(Error::CheckFailed { ref message, status: Some(7), .. }) if message == "script failed"
        ));
        assert!(!script.after_run_called);
    }

    #[tokio::test]
    async fn test_empty_narrowed_list_skips_without_running() {
        // Would fail if it ran.
        let mut script = ScriptCheck::new("exit 1");
        script.narrow_to_nothing = true;

        let result = check(&mut script, &Context::default())
            .await
            .expect("skipped check should pass");

        assert!(result.passed);
        assert!(result.skipped);
        assert!(script.after_run_called);
    }

    #[tokio::test]
    async fn test_timeout_becomes_check_timeout() {
        let mut script = ScriptCheck::new("sleep 10");
        let ctx = Context {
            timeout: Some(Duration::from_millis(100)),
            ..Context::default()
        };

        let result = check(&mut script, &ctx).await;
        assert!(matches!(
            result,
            Err(Error::CheckTimeout { ref name, .. }) if name == "ScriptCheck"
        ));
    }

    #[test]
    fn test_context_options() {
        let ctx = Context {
            executor: Executor::new(),
            cwd: Some(PathBuf::from("/repo")),
            timeout: Some(Duration::from_secs(5)),
        };

        let options = ctx.options(true);
        assert_eq!(options.cwd, Some(PathBuf::from("/repo")));
        assert_eq!(options.timeout, Some(Duration::from_secs(5)));
        assert!(options.capture_output);
        assert!(!ctx.options(false).capture_output);
    }
}
