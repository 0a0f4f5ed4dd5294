//! External linter over staged source files.

use super::{builtin::CheckKind, Check};
use crate::config::LintConfig;
use crate::core::error::{Error, Result};
use crate::core::executor::{CommandLine, CommandOutput};
use crate::core::git::StagedChange;
use std::ffi::OsStr;
use std::path::Path;

/// Runs the configured linter over the staged files with its extension.
#[derive(Debug)]
pub struct LintCheck<'a> {
    diff: &'a StagedChange,
    files: Vec<String>,
    config: &'a LintConfig,
}

impl<'a> LintCheck<'a> {
    /// Creates the check. The file list is narrowed in `before_run`.
    #[must_use]
    pub fn new(diff: &'a StagedChange, config: &'a LintConfig) -> Self {
        Self {
            diff,
            files: diff.filenames().to_vec(),
            config,
        }
    }
}

impl Check for LintCheck<'_> {
    fn name(&self) -> &str {
        CheckKind::Lint.name()
    }

    fn files(&self) -> &[String] {
        &self.files
    }

    fn before_run(&mut self) {
        self.files = select_files(self.diff.filenames(), &self.config.extension);
        tracing::debug!(
            extension = %self.config.extension,
            staged = self.diff.len(),
            selected = self.files.len(),
            "Selected files to lint"
        );
    }

    fn command(&self) -> Result<CommandLine> {
        // `command` may carry leading arguments, e.g. "bundle exec rubocop".
        let mut words = self.config.command.split_whitespace();
        let program = words.next().ok_or_else(|| {
            Error::config_invalid("lint.command", "command must not be empty")
        })?;

        Ok(CommandLine::new(program)
            .args(words)
            .args(self.config.args.iter().cloned())
            .arg("--")
            .args(self.files.iter().cloned()))
    }

    fn report_failure(&self, output: &CommandOutput) -> Error {
        Error::check_failed(
            self.name(),
            format!("{} reported some offenses. Aborting commit", self.config.name),
            Some(output.exit_code),
        )
    }
}

/// Keeps the paths whose final extension is exactly `extension`, in order.
#[must_use]
pub fn select_files(filenames: &[String], extension: &str) -> Vec<String> {
    filenames
        .iter()
        .filter(|name| Path::new(name).extension() == Some(OsStr::new(extension)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{check, Context};
    use crate::core::git::tests::{create_test_repo, stage};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn lint_config(command: &str) -> LintConfig {
        LintConfig {
            command: command.to_string(),
            ..LintConfig::default()
        }
    }

    #[rstest]
    #[case::only_sources(&["app.rb", "lib/util.rb"], &["app.rb", "lib/util.rb"])]
    #[case::mixed(&["readme.md", "app.rb", "app.js", "spec/app_spec.rb"], &["app.rb", "spec/app_spec.rb"])]
    #[case::no_sources(&["readme.md", "Gemfile", "app.js"], &[])]
    #[case::suffix_is_not_extension(&["app.rb.bak", "notrb", "lib.rbx"], &[])]
    #[case::case_sensitive(&["APP.RB"], &[])]
    #[case::dotfile(&[".rb"], &[])]
    fn test_select_files(#[case] staged: &[&str], #[case] expected: &[&str]) {
        let staged: Vec<String> = staged.iter().map(|s| (*s).to_string()).collect();
        assert_eq!(select_files(&staged, "rb"), expected);
    }

    #[test]
    fn test_before_run_narrows_to_subset() {
        let diff = StagedChange::from_filenames(["readme.md", "app.rb", "app.js"]);
        let config = LintConfig::default();
        let mut lint = LintCheck::new(&diff, &config);

        lint.before_run();

        assert_eq!(lint.files(), ["app.rb"]);
        assert!(lint
            .files()
            .iter()
            .all(|f| diff.filenames().contains(f)));
    }

    #[test]
    fn test_command_with_default_linter() {
        let diff = StagedChange::from_filenames(["app.rb", "lib/util.rb"]);
        let config = LintConfig::default();
        let mut lint = LintCheck::new(&diff, &config);
        lint.before_run();

        assert_eq!(
            lint.command().expect("command").to_string(),
            "rubocop -- app.rb lib/util.rb"
        );
    }

    #[test]
    fn test_command_with_leading_words_and_args() {
        let diff = StagedChange::from_filenames(["app.rb"]);
        let config = LintConfig {
            args: vec!["--force-exclusion".to_string()],
            ..lint_config("bundle exec rubocop")
        };
        let mut lint = LintCheck::new(&diff, &config);
        lint.before_run();

        let command = lint.command().expect("command");
        assert_eq!(command.program(), "bundle");
        assert_eq!(
            command.arguments(),
            ["exec", "rubocop", "--force-exclusion", "--", "app.rb"]
        );
    }

    #[test]
    fn test_dash_prefixed_file_stays_an_operand() {
        let diff = StagedChange::from_filenames(["-rf.rb", "app.rb"]);
        let config = LintConfig::default();
        let mut lint = LintCheck::new(&diff, &config);
        lint.before_run();

        let command = lint.command().expect("command");
        assert_eq!(command.arguments(), ["--", "-rf.rb", "app.rb"]);
    }

    #[tokio::test]
    async fn test_non_ascii_source_file_is_linted() {
        let (temp, repo) = create_test_repo();
        stage(&temp, "café.rb", "puts 1\n");
        let diff = repo.staged_change();
        let config = lint_config("false");
        let ctx = Context {
            cwd: Some(repo.root().to_path_buf()),
            ..Context::default()
        };

        let mut lint = LintCheck::new(&diff, &config);
        let result = check(&mut lint, &ctx).await;
        assert_eq!(lint.files(), ["café.rb"]);
        assert!(matches!(result, Err(Error::CheckFailed { .. })));
    }

    #[test]
    fn test_failure_message() {
        let diff = StagedChange::default();
        let config = LintConfig::default();
        let lint = LintCheck::new(&diff, &config);
        let output = CommandOutput {
            exit_code: 1,
            stdout: String::new(),
            stderr: String::new(),
            timed_out: false,
            duration: std::time::Duration::ZERO,
        };

        assert!(!lint.succeeded(&output));
        assert_eq!(
            lint.report_failure(&output).to_string(),
            "Rubocop reported some offenses. Aborting commit"
        );
    }

    #[tokio::test]
    async fn test_no_source_files_skips_linter() {
        let diff = StagedChange::from_filenames(["readme.md"]);
        // Would surface as CommandNotFound if it were run.
        let config = lint_config("definitely-not-a-linter-12345");
        let mut lint = LintCheck::new(&diff, &config);

        let result = check(&mut lint, &Context::default())
            .await
            .expect("skipped lint should pass");
        assert!(result.skipped);
    }

    #[tokio::test]
    async fn test_linter_exit_status_decides() {
        let (temp, repo) = create_test_repo();
        stage(&temp, "app.rb", "puts 1\n");
        let diff = repo.staged_change();
        let ctx = Context {
            cwd: Some(repo.root().to_path_buf()),
            ..Context::default()
        };

        let passing = lint_config("true");
        let result = check(&mut LintCheck::new(&diff, &passing), &ctx)
            .await
            .expect("linter exiting 0 should pass");
        assert!(result.passed);
        assert!(!result.skipped);

        let failing = lint_config("false");
        let result = check(&mut LintCheck::new(&diff, &failing), &ctx).await;
        assert!(matches!(
            result,
            Err(Error::CheckFailed { ref name, status: Some(1), .. }) if name == "LintCheck"
        ));
    }

    #[tokio::test]
    async fn test_missing_linter_is_reported() {
        let diff = StagedChange::from_filenames(["app.rb"]);
        let config = lint_config("definitely-not-a-linter-12345");
        let mut lint = LintCheck::new(&diff, &config);

        let result = check(&mut lint, &Context::default()).await;
        assert!(matches!(result, Err(Error::CommandNotFound { .. })));
    }
}
