//! Error types for commit-guard.
//!
//! Every failure in the hook pipeline is a variant of [`Error`]. A failing
//! check is an error too: it is bubbled up through the runner and turned
//! into the process exit status exactly once, in `main`.

use std::path::PathBuf;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in commit-guard.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // =========================================================================
    // Configuration errors
    // =========================================================================
    /// Configuration file not found.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// Path where config was expected.
        path: PathBuf,
    },

    /// Failed to parse configuration file.
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        /// Description of the parse error.
        message: String,
        /// Optional source error.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {field} - {message}")]
    ConfigInvalid {
        /// Field name that is invalid.
        field: String,
        /// Description of why it's invalid.
        message: String,
    },

    // =========================================================================
    // Git errors
    // =========================================================================
    /// Not in a Git repository.
    #[error("Not in a Git repository")]
    NotGitRepo,

    // =========================================================================
    // Check errors
    // =========================================================================
    /// A check's command signaled failure. The message is the check's own
    /// human-readable explanation.
    #[error("{message}")]
    CheckFailed {
        /// Name of the check that failed.
        name: String,
        /// Explanation shown to the user before aborting.
        message: String,
        /// Exit status of the underlying tool, if it exited normally.
        status: Option<i32>,
    },

    /// A check's command was killed after exceeding the configured timeout.
    #[error("{name} timed out after {timeout}")]
    CheckTimeout {
        /// Name of the check that timed out.
        name: String,
        /// Timeout duration as string.
        timeout: String,
    },

    /// A check variant does not provide a command to run.
    #[error("{check}#command is not implemented")]
    CommandNotImplemented {
        /// Name of the malformed check.
        check: String,
    },

    /// The program a check wants to run is not on `PATH`.
    #[error("Command not found: {command}")]
    CommandNotFound {
        /// The command that wasn't found.
        command: String,
    },

    // =========================================================================
    // Hook errors
    // =========================================================================
    /// Hook already exists and wasn't created by us.
    #[error("Git hook already exists at {path}. Use --force to overwrite.")]
    HookExists {
        /// Path to existing hook.
        path: PathBuf,
    },

    // =========================================================================
    // I/O errors
    // =========================================================================
    /// File I/O error.
    #[error("I/O error: {message}")]
    Io {
        /// Description of what failed.
        message: String,
        /// Source error.
        #[source]
        source: std::io::Error,
    },

    // =========================================================================
    // Internal errors
    // =========================================================================
    /// Internal error (should never happen).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl Error {
    /// Creates a new configuration parse error with source.
    pub fn config_parse_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new invalid configuration error.
    pub fn config_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a new I/O error with context.
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Creates a new check failed error.
    pub fn check_failed(
        name: impl Into<String>,
        message: impl Into<String>,
        status: Option<i32>,
    ) -> Self {
        Self::CheckFailed {
            name: name.into(),
            message: message.into(),
            status,
        }
    }

    /// Returns true if this error comes from a check rejecting the commit,
    /// as opposed to the tool itself misbehaving.
    pub const fn is_check_failure(&self) -> bool {
        matches!(self, Self::CheckFailed { .. } | Self::CheckTimeout { .. })
    }

    /// Returns an exit code appropriate for this error.
    ///
    /// Anything that aborts the commit from inside the check pipeline exits
    /// with 1, whatever status the underlying tool returned.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigNotFound { .. } | Self::ConfigParse { .. } | Self::ConfigInvalid { .. } => {
                78
            }, // EX_CONFIG
            Self::NotGitRepo => 65, // EX_DATAERR
            _ => 1,
        }
    }
}
