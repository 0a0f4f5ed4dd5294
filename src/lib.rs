//! # commit-guard
//!
//! A git pre-commit hook that keeps debugging leftovers and lint offenses
//! out of commits.
//!
//! On every commit it reads the staged change set, then runs two checks in
//! order:
//!
//! - **KeywordCheck**: fails if the staged diff adds or removes a line
//!   matching a forbidden keyword (`binding.pry`, `throw`, `console.log`,
//!   `debugger` by default).
//! - **LintCheck**: runs a linter (`rubocop` by default) over the staged
//!   files with the configured extension, and fails if it reports offenses.
//!
//! The first failing check aborts the commit.
//!
//! ## Example
//!
//! ```rust,no_run
//! use commit_guard::{Config, Runner};
//!
//! fn main() -> commit_guard::Result<()> {
//!     let config = Config::load_or_default()?;
//!     let runner = Runner::new(config);
//!
//!     let rt = tokio::runtime::Builder::new_current_thread()
//!         .enable_all()
//!         .build()
//!         .map_err(|e| commit_guard::Error::io("build runtime", e))?;
//!
//!     match rt.block_on(runner.run()) {
//!         Ok(_) => Ok(()),
//!         Err(e) => std::process::exit(e.exit_code()),
//!     }
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/commit-guard/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod checks;
pub mod cli;
pub mod config;
pub mod core;

// Re-export main types for convenience
pub use checks::{Check, CheckKind, KeywordCheck, LintCheck};
pub use config::Config;
pub use core::error::{Error, Result};
pub use core::git::StagedChange;
pub use core::runner::{CheckResult, RunResult, Runner};
