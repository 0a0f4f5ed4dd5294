//! Configuration handling for commit-guard.
//!
//! The hook runs fine without any configuration: the defaults reproduce the
//! built-in keyword list and the `rubocop` linter on `.rb` files. A
//! `commit-guard.toml` found in the working directory or one of its parents
//! can override those values, but never the set or order of checks.

use crate::core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "commit-guard.toml";

/// Keywords that must not appear in a staged diff.
pub const DEFAULT_KEYWORDS: &[&str] = &["binding.pry", "throw", "console.log", "debugger"];

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-command timeout (humantime syntax). Unset means no timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    /// Keyword scan settings.
    pub keywords: KeywordsConfig,
    /// Linter settings.
    pub lint: LintConfig,
}

/// Forbidden keyword settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordsConfig {
    /// Patterns joined into a single `git diff -G` alternation.
    pub patterns: Vec<String>,
}

impl Default for KeywordsConfig {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
        }
    }
}

/// Linter settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Display name used in the failure message.
    pub name: String,
    /// Linter executable.
    pub command: String,
    /// Arguments placed before the file list.
    pub args: Vec<String>,
    /// Source extension (without the dot) of the files to lint.
    pub extension: String,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            name: "Rubocop".to_string(),
            command: "rubocop".to_string(),
            args: Vec::new(),
            extension: "rb".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the default location.
    pub fn load() -> Result<Self> {
        let path = Self::find_config_file()?;
        Self::load_from(&path)
    }

    /// Loads configuration or returns defaults if not found.
    pub fn load_or_default() -> Result<Self> {
        match Self::find_config_file() {
            Ok(path) => Self::load_from(&path),
            Err(Error::ConfigNotFound { .. }) => {
                tracing::debug!("No {CONFIG_FILE_NAME} found, using defaults");
                Ok(Self::default())
            },
            Err(e) => Err(e),
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io("read config", e))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::config_parse_with_source("Failed to parse TOML", e))?;

        config.validate()?;

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Finds the configuration file by searching up from the current directory.
    pub fn find_config_file() -> Result<PathBuf> {
        let cwd = std::env::current_dir().map_err(|e| Error::io("get current dir", e))?;
        Self::find_config_file_from(&cwd)
    }

    /// Finds the configuration file by searching up from `start`.
    pub fn find_config_file_from(start: &Path) -> Result<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| Error::ConfigNotFound {
                path: start.join(CONFIG_FILE_NAME),
            })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref timeout) = self.timeout {
            if humantime::parse_duration(timeout).is_err() {
                return Err(Error::config_invalid(
                    "timeout",
                    format!("Invalid duration: {timeout}"),
                ));
            }
        }

        for (i, pattern) in self.keywords.patterns.iter().enumerate() {
            let field = format!("keywords.patterns[{i}]");
            // An empty alternative would match every line of the diff.
            if pattern.is_empty() {
                return Err(Error::config_invalid(field, "pattern must not be empty"));
            }
            if let Err(e) = regex::Regex::new(pattern) {
                return Err(Error::config_invalid(field, format!("Invalid pattern: {e}")));
            }
            if let Some(construct) = non_posix_construct(pattern) {
                return Err(Error::config_invalid(
                    field,
                    format!(
                        "`{construct}` is not POSIX extended regex syntax, \
                         which git diff -G uses"
                    ),
                ));
            }
        }

        if self.lint.command.trim().is_empty() {
            return Err(Error::config_invalid(
                "lint.command",
                "command must not be empty",
            ));
        }

        if self.lint.extension.is_empty() {
            return Err(Error::config_invalid(
                "lint.extension",
                "extension must not be empty",
            ));
        }

        if self.lint.extension.starts_with('.') {
            return Err(Error::config_invalid(
                "lint.extension",
                format!(
                    "write the extension without the leading dot: {}",
                    self.lint.extension.trim_start_matches('.')
                ),
            ));
        }

        Ok(())
    }

    /// Returns the parsed per-command timeout, if one is configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        let raw = self.timeout.as_deref()?;
        match humantime::parse_duration(raw) {
            Ok(duration) => Some(duration),
            Err(e) => {
                tracing::warn!(timeout = %raw, error = %e, "Invalid timeout format, ignoring");
                None
            },
        }
    }

    /// Generates default configuration as a string.
    pub fn default_toml() -> Result<String> {
        toml::to_string_pretty(&Self::default()).map_err(|e| Error::Internal {
            message: format!("Failed to serialize config: {e}"),
        })
    }
}

/// Returns the first piece of `pattern` that the `regex` crate accepts but
/// POSIX extended regular expressions do not.
fn non_posix_construct(pattern: &str) -> Option<String> {
    let mut chars = pattern.chars().peekable();
    let mut after_quantifier = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = chars.next()?;
                if "bBdDsSwWAzpPQEhHvVRXK".contains(escaped) {
                    return Some(format!("\\{escaped}"));
                }
                after_quantifier = false;
            },
            '(' if chars.peek() == Some(&'?') => return Some("(?".to_string()),
            '?' | '+' if after_quantifier => return Some(format!("lazy or possessive `{c}`")),
            '*' | '+' | '?' | '}' => after_quantifier = true,
            '[' => {
                // Skip the bracket expression; `]` right after `[` or `[^` is a member.
                if chars.peek() == Some(&'^') {
                    chars.next();
                }
                if chars.peek() == Some(&']') {
                    chars.next();
                }
                for c in chars.by_ref() {
                    if c == ']' {
                        break;
                    }
                }
                after_quantifier = false;
            },
            _ => after_quantifier = false,
        }
    }

    None
}
