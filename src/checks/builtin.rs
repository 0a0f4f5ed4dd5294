//! Built-in check definitions.
//!
//! The set of checks is closed and their order is fixed: the keyword scan
//! always runs before the linter.

use std::fmt;

/// One of the built-in checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    /// Scan the staged diff for forbidden keywords.
    Keywords,
    /// Run the linter over staged source files.
    Lint,
}

impl CheckKind {
    /// Every built-in check, in run order.
    pub const ORDER: [Self; 2] = [Self::Keywords, Self::Lint];

    /// Returns the name shown in banners.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Keywords => "KeywordCheck",
            Self::Lint => "LintCheck",
        }
    }

    /// Returns a one-line description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Keywords => "Reject staged diffs containing forbidden keywords",
            Self::Lint => "Lint staged source files",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
