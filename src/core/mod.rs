//! Core functionality for commit-guard.
//!
//! This module contains the main components:
//! - [`git`]: Repository discovery and the staged change set
//! - [`executor`]: External command execution
//! - [`runner`]: The check pipeline
//! - [`error`]: Error types and result handling

pub mod error;
pub mod executor;
pub mod git;
pub mod runner;
