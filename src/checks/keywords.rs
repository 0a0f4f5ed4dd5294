//! Forbidden keyword scan over the staged diff.
//!
//! The scan looks at diff content, not file names, so it keeps the full
//! staged file list and lets git's pickaxe (`-G`) do the matching: the diff
//! comes back empty unless an added or removed line matches one of the
//! keywords.

use super::{builtin::CheckKind, Check, Context};
use crate::core::error::{Error, Result};
use crate::core::executor::{CommandLine, CommandOutput};
use crate::core::git::StagedChange;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;

/// Rejects a commit whose staged diff mentions a forbidden keyword.
#[derive(Debug)]
pub struct KeywordCheck<'a> {
    files: Vec<String>,
    keywords: &'a [String],
}

impl<'a> KeywordCheck<'a> {
    /// Creates the check over every staged file.
    #[must_use]
    pub fn new(diff: &StagedChange, keywords: &'a [String]) -> Self {
        Self {
            files: diff.filenames().to_vec(),
            keywords,
        }
    }

    /// Returns the alternation handed to `git diff -G`.
    #[must_use]
    pub fn pattern(&self) -> String {
        self.keywords.join("|")
    }
}

impl Check for KeywordCheck<'_> {
    fn name(&self) -> &str {
        CheckKind::Keywords.name()
    }

    fn files(&self) -> &[String] {
        &self.files
    }

    fn command(&self) -> Result<CommandLine> {
        Ok(CommandLine::new("git")
            .args(["diff", "--cached"])
            .arg(format!("-G{}", self.pattern()))
            .arg("--")
            .args(self.files.iter().cloned()))
    }

    /// Captures the matching diff and echoes it, instead of streaming.
    async fn run_command(&self, command: &CommandLine, ctx: &Context) -> Result<CommandOutput> {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .ok()
                .unwrap_or_else(ProgressStyle::default_spinner),
        );
        pb.set_message("Scanning staged diff...");
        pb.enable_steady_tick(Duration::from_millis(100));

        let output = ctx.executor.execute(command, &ctx.options(true)).await;
        pb.finish_and_clear();
        let output = output?;

        if !output.success() {
            tracing::debug!(
                exit_code = output.exit_code,
                stderr = %output.stderr.trim(),
                "git diff exited unsuccessfully during keyword scan"
            );
        }

        if !output.stdout.is_empty() {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(output.stdout.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|e| Error::io("write keyword matches", e))?;
        }

        Ok(output)
    }

    /// Empty output only counts when git actually ran the scan: a rejected
    /// pattern also produces no diff.
    fn succeeded(&self, output: &CommandOutput) -> bool {
        output.success() && output.stdout.is_empty()
    }

    fn report_failure(&self, output: &CommandOutput) -> Error {
        if !output.success() {
            return Error::check_failed(
                self.name(),
                format!(
                    "git diff could not scan for keywords (exit {}): {}",
                    output.exit_code,
                    output.stderr.trim()
                ),
                Some(output.exit_code),
            );
        }

        Error::check_failed(
            self.name(),
            format!(
                "There are files that contain this keywords: {}.",
                self.keywords.join(", ")
            ),
            Some(output.exit_code),
        )
    }
}
