//! CLI command implementations.

use crate::checks::{Check, CheckKind, KeywordCheck, LintCheck};
use crate::config::{Config, CONFIG_FILE_NAME};
use crate::core::error::{Error, Result};
use crate::core::executor::Executor;
use crate::core::git::{GitRepo, StagedChange};
use crate::core::runner::Runner;
use console::style;
use serde::Serialize;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

/// Hook script template.
const HOOK_SCRIPT: &str = r#"#!/bin/sh
# commit-guard hook - installed by `commit-guard install`
# Bypass once with: git commit --no-verify

exec commit-guard run
"#;

/// Hook marker comment.
const HOOK_MARKER: &str = "# commit-guard hook";

/// Run the check pipeline against the staged change set.
pub fn run() -> Result<ExitCode> {
    let config = Config::load_or_default()?;
    let runner = Runner::new(config);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Internal {
            message: format!("Failed to create runtime: {e}"),
        })?;

    match rt.block_on(runner.run()) {
        Ok(result) if result.success() => {
            eprintln!(
                "{} All checks passed ({} passed, {} skipped) in {:?}",
                style("✓").green().bold(),
                result.passed_count(),
                result.skipped_count(),
                result.duration
            );
            Ok(ExitCode::SUCCESS)
        },
        Ok(_) => Ok(ExitCode::FAILURE),
        Err(e) if e.is_check_failure() => {
            eprintln!("{} {e}", style("✗").red().bold());
            Ok(ExitCode::FAILURE)
        },
        Err(e) => Err(e),
    }
}

/// Install git hook.
pub fn install(force: bool) -> Result<ExitCode> {
    let repo = GitRepo::discover()?;
    let hooks_dir = repo.hooks_dir();
    let hook_path = hooks_dir.join("pre-commit");

    if !hooks_dir.exists() {
        std::fs::create_dir_all(&hooks_dir).map_err(|e| Error::io("create hooks dir", e))?;
    }

    if hook_path.exists() {
        let content =
            std::fs::read_to_string(&hook_path).map_err(|e| Error::io("read existing hook", e))?;

        if content.contains(HOOK_MARKER) {
            eprintln!(
                "{} Hook already installed at {}",
                style("✓").green(),
                hook_path.display()
            );
            return Ok(ExitCode::SUCCESS);
        }

        if !force && !confirm_overwrite(&hook_path)? {
            return Err(Error::HookExists { path: hook_path });
        }

        let backup_path = hooks_dir.join("pre-commit.bak");
        std::fs::rename(&hook_path, &backup_path).map_err(|e| Error::io("backup hook", e))?;
        eprintln!(
            "{} Backed up existing hook to {}",
            style("•").cyan(),
            backup_path.display()
        );
    }

    std::fs::write(&hook_path, HOOK_SCRIPT).map_err(|e| Error::io("write hook", e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(&hook_path)
            .map_err(|e| Error::io("get hook metadata", e))?
            .permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&hook_path, perms).map_err(|e| Error::io("set hook perms", e))?;
    }

    eprintln!(
        "{} Installed pre-commit hook at {}",
        style("✓").green(),
        hook_path.display()
    );

    Ok(ExitCode::SUCCESS)
}

/// Asks before replacing a hook we did not write. Never asks without a terminal.
fn confirm_overwrite(hook_path: &std::path::Path) -> Result<bool> {
    if !std::io::stdin().is_terminal() || !std::io::stderr().is_terminal() {
        return Ok(false);
    }

    dialoguer::Confirm::new()
        .with_prompt(format!(
            "A pre-commit hook already exists at {}. Back it up and replace it?",
            hook_path.display()
        ))
        .default(false)
        .interact()
        .map_err(|e| Error::Internal {
            message: format!("Failed to read confirmation: {e}"),
        })
}

/// Uninstall git hook.
pub fn uninstall() -> Result<ExitCode> {
    let repo = GitRepo::discover()?;
    let hook_path = repo.hook_path("pre-commit");

    if !hook_path.exists() {
        eprintln!(
            "{} No hook installed at {}",
            style("•").cyan(),
            hook_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let content = std::fs::read_to_string(&hook_path).map_err(|e| Error::io("read hook", e))?;

    if !content.contains(HOOK_MARKER) {
        eprintln!(
            "{} Hook at {} was not installed by commit-guard",
            style("!").yellow(),
            hook_path.display()
        );
        eprintln!("  Remove manually if desired.");
        return Ok(ExitCode::FAILURE);
    }

    std::fs::remove_file(&hook_path).map_err(|e| Error::io("remove hook", e))?;

    eprintln!(
        "{} Removed pre-commit hook from {}",
        style("✓").green(),
        hook_path.display()
    );

    let backup_path = repo.hooks_dir().join("pre-commit.bak");
    if backup_path.exists() {
        eprintln!(
            "  Backup exists at {} - restore if needed",
            backup_path.display()
        );
    }

    Ok(ExitCode::SUCCESS)
}

/// Write the default configuration file.
pub fn init(force: bool) -> Result<ExitCode> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        eprintln!(
            "{} Configuration already exists: {}",
            style("!").yellow(),
            config_path.display()
        );
        eprintln!("  Use --force to overwrite.");
        return Ok(ExitCode::FAILURE);
    }

    let toml = Config::default_toml()?;
    std::fs::write(&config_path, toml).map_err(|e| Error::io("write config", e))?;

    eprintln!("{} Created {}", style("✓").green(), config_path.display());
    eprintln!("\nNext steps:");
    eprintln!("  1. Review and customize {CONFIG_FILE_NAME}");
    eprintln!("  2. Run: commit-guard install");

    Ok(ExitCode::SUCCESS)
}

/// Validate configuration.
pub fn validate() -> Result<ExitCode> {
    match Config::load() {
        Ok(_) => {
            eprintln!("{} Configuration is valid", style("✓").green());
            Ok(ExitCode::SUCCESS)
        },
        Err(Error::ConfigNotFound { path }) => {
            eprintln!(
                "{} Configuration not found: {}",
                style("!").yellow(),
                path.display()
            );
            eprintln!("  Run: commit-guard init");
            Ok(ExitCode::FAILURE)
        },
        Err(e) => {
            eprintln!("{} Configuration is invalid: {e}", style("✗").red());
            Ok(ExitCode::FAILURE)
        },
    }
}

/// One entry of `list` output.
#[derive(Debug, Serialize)]
struct CheckListing {
    name: &'static str,
    description: &'static str,
    command: String,
    program: String,
    available: bool,
    /// Extension the file list is narrowed to, if any.
    extension: Option<String>,
}

/// The whole `list` output.
#[derive(Debug, Serialize)]
struct Listing {
    checks: Vec<CheckListing>,
    keywords: Vec<String>,
}

/// Builds the listing with each check's command over an empty file list.
fn listing(config: &Config) -> Result<Listing> {
    let no_files = StagedChange::default();
    let mut checks = Vec::with_capacity(CheckKind::ORDER.len());

    for kind in CheckKind::ORDER {
        let (command, extension) = match kind {
            CheckKind::Keywords => (
                KeywordCheck::new(&no_files, &config.keywords.patterns).command()?,
                None,
            ),
            CheckKind::Lint => (
                LintCheck::new(&no_files, &config.lint).command()?,
                Some(config.lint.extension.clone()),
            ),
        };

        checks.push(CheckListing {
            name: kind.name(),
            description: kind.description(),
            available: Executor::command_exists(command.program()),
            program: command.program().to_string(),
            command: command.to_string(),
            extension,
        });
    }

    Ok(Listing {
        checks,
        keywords: config.keywords.patterns.clone(),
    })
}

/// List the checks in run order.
pub fn list(json: bool) -> Result<ExitCode> {
    let config = Config::load_or_default()?;
    let listing = listing(&config)?;

    if json {
        let out = serde_json::to_string_pretty(&listing).map_err(|e| Error::Internal {
            message: format!("Failed to serialize listing: {e}"),
        })?;
        println!("{out}");
        return Ok(ExitCode::SUCCESS);
    }

    eprintln!("{}", style("Checks (in run order):").bold());
    for (i, check) in listing.checks.iter().enumerate() {
        let files = match check.extension {
            Some(ref ext) => format!("<staged .{ext} files>"),
            None => "<staged files>".to_string(),
        };
        eprintln!(
            "  {}. {} - {}",
            i + 1,
            style(check.name).cyan(),
            check.description
        );
        eprintln!("     {} {files}", check.command);
        if !check.available {
            eprintln!(
                "     {} {} not found on PATH",
                style("!").yellow(),
                check.program
            );
        }
    }

    eprintln!();
    eprintln!(
        "{} {}",
        style("Forbidden keywords:").bold(),
        listing.keywords.join(", ")
    );

    Ok(ExitCode::SUCCESS)
}

/// Generate shell completions.
pub fn completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    clap_complete::generate(
        shell,
        &mut super::Cli::command(),
        "commit-guard",
        &mut std::io::stdout(),
    );
}
