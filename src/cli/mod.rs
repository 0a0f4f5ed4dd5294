//! Command-line interface for commit-guard.
//!
//! With no subcommand the binary runs the check pipeline, which is what the
//! installed pre-commit hook does. The other subcommands manage the hook and
//! the optional configuration file:
//! - `run`: Run the checks against the staged change set
//! - `install`: Install the git hook
//! - `uninstall`: Remove the git hook
//! - `init`: Write the default configuration
//! - `validate`: Validate configuration
//! - `list`: List the checks in run order

mod commands;

use crate::core::error::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Git pre-commit hook that scans staged changes for forbidden keywords and lints them.
#[derive(Debug, Parser)]
#[command(
    name = "commit-guard",
    author,
    version,
    about = "Git pre-commit hook that scans staged changes for forbidden keywords and lints them",
    long_about = r#"
commit-guard checks what you are about to commit:

  1. KeywordCheck  rejects staged diffs that add or remove a line matching
                   a forbidden keyword (binding.pry, throw, console.log,
                   debugger).
  2. LintCheck     runs the linter (rubocop) on the staged .rb files.

The first failing check aborts the commit.

Quick start:
  commit-guard install   # Install git hook
  commit-guard init      # Optional: write commit-guard.toml to customize

Bypass the hook for one commit with `git commit --no-verify`.
"#,
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use color output.
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,
}

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Always use color.
    Always,
    /// Auto-detect color support.
    #[default]
    Auto,
    /// Never use color.
    Never,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the checks against the staged change set (the default).
    #[command(visible_alias = "r")]
    Run,

    /// Install the git pre-commit hook.
    Install {
        /// Overwrite an existing hook (it is backed up first).
        #[arg(short, long)]
        force: bool,
    },

    /// Remove the git pre-commit hook.
    Uninstall,

    /// Write the default configuration file.
    #[command(visible_alias = "i")]
    Init {
        /// Overwrite existing configuration.
        #[arg(short, long)]
        force: bool,
    },

    /// Validate the configuration file.
    #[command(visible_alias = "v")]
    Validate,

    /// List the checks in the order they run.
    #[command(visible_alias = "l")]
    List {
        /// Print the listing as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Runs the CLI.
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);
    setup_color(cli.color);

    match cli.command {
        Some(Commands::Run) | None => commands::run(),
        Some(Commands::Install { force }) => commands::install(force),
        Some(Commands::Uninstall) => commands::uninstall(),
        Some(Commands::Init { force }) => commands::init(force),
        Some(Commands::Validate) => commands::validate(),
        Some(Commands::List { json }) => commands::list(json),
        Some(Commands::Completions { shell }) => {
            commands::completions(shell);
            Ok(ExitCode::SUCCESS)
        },
    }
}

/// Sets up logging based on verbosity flags.
fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Sets up color output.
fn setup_color(choice: ColorChoice) {
    match choice {
        ColorChoice::Always => {
            console::set_colors_enabled(true);
            console::set_colors_enabled_stderr(true);
        },
        ColorChoice::Never => {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        },
        ColorChoice::Auto => {
            // Let console crate auto-detect
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_cli_parsing_help() {
        let cli = Cli::try_parse_from(["commit-guard", "--help"]);
        // --help causes early exit, so this will be an error
        assert!(cli.is_err());
    }

    #[test]
    fn test_parse_no_subcommand_runs_checks() {
        let cli = Cli::try_parse_from(["commit-guard"]).expect("parse");
        assert!(cli.command.is_none());
    }

    #[rstest]
    #[case::run(&["commit-guard", "run"])]
    #[case::run_alias(&["commit-guard", "r"])]
    fn test_parse_run(#[case] args: &[&str]) {
        let cli = Cli::try_parse_from(args).expect("parse");
        assert!(matches!(cli.command, Some(Commands::Run)));
    }

    #[test]
    fn test_run_takes_no_arguments() {
        assert!(Cli::try_parse_from(["commit-guard", "run", "app.rb"]).is_err());
    }

    #[test]
    fn test_parse_install() {
        let cli = Cli::try_parse_from(["commit-guard", "install"]).expect("parse");
        assert!(matches!(cli.command, Some(Commands::Install { force: false })));

        let cli = Cli::try_parse_from(["commit-guard", "install", "--force"]).expect("parse");
        assert!(matches!(cli.command, Some(Commands::Install { force: true })));
    }

    #[test]
    fn test_parse_uninstall() {
        let cli = Cli::try_parse_from(["commit-guard", "uninstall"]).expect("parse");
        assert!(matches!(cli.command, Some(Commands::Uninstall)));
    }

    #[test]
    fn test_parse_init() {
        let cli = Cli::try_parse_from(["commit-guard", "i", "-f"]).expect("parse");
        assert!(matches!(cli.command, Some(Commands::Init { force: true })));
    }

    #[test]
    fn test_parse_validate() {
        let cli = Cli::try_parse_from(["commit-guard", "v"]).expect("parse");
        assert!(matches!(cli.command, Some(Commands::Validate)));
    }

    #[test]
    fn test_parse_list() {
        let cli = Cli::try_parse_from(["commit-guard", "list"]).expect("parse");
        assert!(matches!(cli.command, Some(Commands::List { json: false })));

        let cli = Cli::try_parse_from(["commit-guard", "l", "--json"]).expect("parse");
        assert!(matches!(cli.command, Some(Commands::List { json: true })));
    }

    #[rstest]
    #[case("bash")]
    #[case("zsh")]
    #[case("fish")]
    fn test_parse_completions(#[case] shell: &str) {
        let cli = Cli::try_parse_from(["commit-guard", "completions", shell]).expect("parse");
        assert!(matches!(cli.command, Some(Commands::Completions { .. })));
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from(["commit-guard", "-v", "--color", "never", "run"])
            .expect("parse");
        assert!(cli.verbose);
        assert!(!cli.quiet);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn test_parse_color_auto_default() {
        let cli = Cli::try_parse_from(["commit-guard", "-q"]).expect("parse");
        assert!(cli.quiet);
        assert_eq!(cli.color, ColorChoice::Auto);
    }

    #[test]
    fn test_parse_invalid_color() {
        assert!(Cli::try_parse_from(["commit-guard", "--color", "sometimes"]).is_err());
    }
}
