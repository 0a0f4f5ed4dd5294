//! Check runner for the pre-commit pipeline.
//!
//! The runner reads the staged change set once, then runs every built-in
//! check against it in [`CheckKind::ORDER`]. The first failing check ends the
//! run: its error is returned and the remaining checks never start.

use crate::checks::{self, CheckKind, Context, KeywordCheck, LintCheck};
use crate::config::Config;
use crate::core::error::Result;
use crate::core::executor::{CommandOutput, Executor};
use crate::core::git::{GitRepo, StagedChange};
use std::time::Duration;

/// Result of running a single check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check.
    pub name: String,
    /// Whether the check passed.
    pub passed: bool,
    /// Output from the check.
    pub output: CommandOutput,
    /// Whether the check was skipped.
    pub skipped: bool,
}

impl CheckResult {
    /// Creates a passed check result.
    pub(crate) fn passed(name: String, output: CommandOutput) -> Self {
        Self {
            name,
            passed: true,
            output,
            skipped: false,
        }
    }

    /// Creates a skipped check result.
    pub(crate) fn skipped(name: String) -> Self {
        Self {
            name,
            passed: true, // Skipped checks don't fail
            output: CommandOutput {
                exit_code: 0,
                stdout: String::new(),
                stderr: String::new(),
                timed_out: false,
                duration: Duration::ZERO,
            },
            skipped: true,
        }
    }
}

/// Result of a run in which no check failed.
#[derive(Debug)]
pub struct RunResult {
    /// Individual check results, in run order.
    pub checks: Vec<CheckResult>,
    /// Total duration.
    pub duration: Duration,
}

impl RunResult {
    /// Returns true if all checks passed.
    #[must_use]
    pub fn success(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Returns the number of checks that ran and passed.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.passed && !c.skipped)
            .count()
    }

    /// Returns the number of skipped checks.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.checks.iter().filter(|c| c.skipped).count()
    }
}

/// Runner for executing checks.
#[derive(Debug)]
pub struct Runner {
    config: Config,
    repo: Option<GitRepo>,
}

impl Runner {
    /// Creates a new runner for the repository around the current directory.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            repo: GitRepo::discover().ok(),
        }
    }

    /// Creates a new runner with a specific repository.
    #[must_use]
    pub fn with_repo(config: Config, repo: GitRepo) -> Self {
        Self {
            config,
            repo: Some(repo),
        }
    }

    /// Reads the staged change set.
    #[must_use]
    pub fn staged_change(&self) -> StagedChange {
        match self.repo {
            Some(ref repo) => repo.staged_change(),
            None => StagedChange::read(None),
        }
    }

    /// Runs every check against the current index.
    pub async fn run(&self) -> Result<RunResult> {
        let staged = self.staged_change();
        self.run_with(&staged).await
    }

    /// Runs every check against `staged`, stopping at the first failure.
    pub async fn run_with(&self, staged: &StagedChange) -> Result<RunResult> {
        let start = std::time::Instant::now();

        let ctx = Context {
            executor: Executor::new(),
            cwd: self.repo.as_ref().map(|r| r.root().to_path_buf()),
            timeout: self.config.timeout(),
        };

        let mut results = Vec::with_capacity(CheckKind::ORDER.len());

        for kind in CheckKind::ORDER {
            tracing::debug!(check = kind.name(), "Starting check");
            let result = match kind {
                CheckKind::Keywords => {
                    let mut check = KeywordCheck::new(staged, &self.config.keywords.patterns);
                    checks::check(&mut check, &ctx).await?
                },
                CheckKind::Lint => {
                    let mut check = LintCheck::new(staged, &self.config.lint);
                    checks::check(&mut check, &ctx).await?
                },
            };
            results.push(result);
        }

        Ok(RunResult {
            checks: results,
            duration: start.elapsed(),
        })
    }
}
