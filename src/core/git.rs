//! Git repository operations.
//!
//! This module locates the repository and its hooks directory, and reads the
//! staged change set from the index.

use crate::core::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Status letters passed to `--diff-filter`: Added, Copied, Modified.
pub const DIFF_FILTER: &str = "ACM";

/// Represents a Git repository.
#[derive(Debug, Clone)]
pub struct GitRepo {
    /// Root directory of the repository (where .git is).
    root: PathBuf,
    /// Path to the .git directory (or file for worktrees).
    git_dir: PathBuf,
}

impl GitRepo {
    /// Discovers the Git repository from the current directory.
    pub fn discover() -> Result<Self> {
        Self::discover_from(&std::env::current_dir().map_err(|e| Error::io("get current dir", e))?)
    }

    /// Discovers the Git repository from a specific path.
    pub fn discover_from(path: &Path) -> Result<Self> {
        let output = Command::new("git")
            .args(["rev-parse", "--show-toplevel", "--git-dir"])
            .current_dir(path)
            .output()
            .map_err(|e| Error::io("run git rev-parse", e))?;

        if !output.status.success() {
            return Err(Error::NotGitRepo);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut lines = stdout.lines();

        let root = lines.next().map(PathBuf::from).ok_or(Error::NotGitRepo)?;

        let git_dir = lines
            .next()
            .map(|s| {
                let p = PathBuf::from(s);
                if p.is_absolute() {
                    p
                } else {
                    path.join(p)
                }
            })
            .ok_or(Error::NotGitRepo)?;

        Ok(Self { root, git_dir })
    }

    /// Returns the root directory of the repository.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .git directory path.
    #[must_use]
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Returns the hooks directory path, honouring `core.hooksPath`.
    #[must_use]
    pub fn hooks_dir(&self) -> PathBuf {
        if let Ok(output) = Command::new("git")
            .args(["config", "--get", "core.hooksPath"])
            .current_dir(&self.root)
            .output()
        {
            if output.status.success() {
                let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !path.is_empty() {
                    let hooks_path = PathBuf::from(&path);
                    if hooks_path.is_absolute() {
                        return hooks_path;
                    }
                    return self.root.join(hooks_path);
                }
            }
        }

        self.git_dir.join("hooks")
    }

    /// Returns the path to a specific hook.
    #[must_use]
    pub fn hook_path(&self, hook_name: &str) -> PathBuf {
        self.hooks_dir().join(hook_name)
    }

    /// Reads the staged change set of this repository.
    #[must_use]
    pub fn staged_change(&self) -> StagedChange {
        StagedChange::read(Some(&self.root))
    }
}

/// The files staged for the next commit.
///
/// Paths are kept exactly as git prints them (relative to the repository
/// root, in git's order). The list is read once and never changes; checks
/// borrow it and build their own narrowed views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedChange {
    filenames: Vec<String>,
}

impl StagedChange {
    /// Reads the added, copied and modified paths from the index.
    ///
    /// Runs in `cwd` when given, otherwise in the current directory. A git
    /// failure is indistinguishable from an empty index: both produce an
    /// empty change set, so every check is skipped.
    #[must_use]
    pub fn read(cwd: Option<&Path>) -> Self {
        let filter = format!("--diff-filter={DIFF_FILTER}");
        let mut cmd = Command::new("git");
        // `-z` keeps paths verbatim; without it git C-quotes non-ASCII names.
        cmd.args(["diff", "--cached", "--name-only", "-z", filter.as_str()]);
        if let Some(cwd) = cwd {
            cmd.current_dir(cwd);
        }

        let output = match cmd.output() {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(error = %e, "Could not run git diff, treating index as empty");
                return Self::default();
            },
        };

        if !output.status.success() {
            tracing::warn!(
                status = ?output.status.code(),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "git diff --cached failed, treating index as empty"
            );
            return Self::default();
        }

        let change = Self::from_output(&String::from_utf8_lossy(&output.stdout));
        tracing::debug!(files = change.len(), "Read staged change set");
        change
    }

    /// Builds a change set from NUL-separated `git diff --name-only -z` output.
    #[must_use]
    pub fn from_output(stdout: &str) -> Self {
        Self::from_filenames(stdout.split('\0').filter(|s| !s.is_empty()))
    }

    /// Builds a change set from a list of paths.
    pub fn from_filenames<I, S>(filenames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            filenames: filenames.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the staged paths in git's order.
    #[must_use]
    pub fn filenames(&self) -> &[String] {
        &self.filenames
    }

    /// Returns the number of staged paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filenames.len()
    }

    /// Returns true if nothing relevant is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty()
    }
}
