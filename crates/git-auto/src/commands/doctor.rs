//! Doctor command: diagnose configuration, git, and environment.

use std::time::Duration;

use camino::Utf8Path;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::Confirm;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use git_auto_core::config::{self, Config, GitConfig};
use git_auto_core::git::{self, DEFAULT_PROGRAM};

/// Arguments for the `doctor` subcommand.
#[derive(Args, Debug, Default)]
pub struct DoctorArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct DoctorReport {
    git: GitStatus,
    config: ConfigStatus,
    directories: DirectoryPaths,
    environment: EnvironmentInfo,
}

#[derive(Serialize)]
struct GitStatus {
    /// Program name or path from config (or the default)
    program: String,
    /// Where the program resolved to, if anywhere
    resolved: Option<String>,
}

#[derive(Serialize)]
struct ConfigStatus {
    /// User config file merged from the XDG config dir, if any
    user: Option<String>,
    /// Project config file that applies to the repository, if any
    project: Option<String>,
    /// Whether either file was found
    found: bool,
    log_level: &'static str,
}

#[derive(Serialize)]
struct DirectoryPaths {
    config: Option<String>,
    data_local: Option<String>,
}

#[derive(Serialize)]
struct EnvironmentInfo {
    repo_dir: String,
    env_vars: Vec<EnvVar>,
}

#[derive(Serialize)]
struct EnvVar {
    name: &'static str,
    value: Option<String>,
    description: &'static str,
}

const ENV_VARS: &[(&str, &str)] = &[
    ("XDG_CONFIG_HOME", "Override config directory"),
    ("XDG_DATA_HOME", "Override data directory"),
    ("RUST_LOG", "Log filter directive"),
    ("GIT_AUTO_LOG_PATH", "Explicit log file path"),
    ("GIT_AUTO_LOG_DIR", "Log directory"),
];

impl DoctorReport {
    fn gather(config: &Config, repo_dir: &Utf8Path) -> Self {
        let program = config.git_program().to_string();
        let resolved = git::locate(&program).map(|p| p.display().to_string());
        let user = config::find_user_config();
        let project = config::find_project_config(repo_dir);

        Self {
            git: GitStatus { program, resolved },
            config: ConfigStatus {
                found: user.is_some() || project.is_some(),
                user: user.map(|p| p.to_string()),
                project: project.map(|p| p.to_string()),
                log_level: config.log_level.as_str(),
            },
            directories: DirectoryPaths {
                config: config::user_config_dir().map(|p| p.to_string()),
                data_local: config::user_data_local_dir().map(|p| p.to_string()),
            },
            environment: EnvironmentInfo {
                repo_dir: repo_dir.to_string(),
                env_vars: ENV_VARS
                    .iter()
                    .map(|&(name, description)| EnvVar {
                        name,
                        value: std::env::var(name).ok(),
                        description,
                    })
                    .collect(),
            },
        }
    }
}

/// Run diagnostics and report configuration status.
///
/// # Arguments
/// * `global_json` - Global `--json` flag from CLI
/// * `config` - Loaded configuration
/// * `repo_dir` - Repository directory the other commands would operate on
#[instrument(name = "cmd_doctor", skip_all)]
pub fn cmd_doctor(
    _args: &DoctorArgs,
    global_json: bool,
    config: &Config,
    repo_dir: &Utf8Path,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing doctor command");

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message("Gathering diagnostics...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    let report = DoctorReport::gather(config, repo_dir);
    spinner.finish_and_clear();

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Git".bold().underline());
    match &report.git.resolved {
        Some(path) => println!("  {} {} ({})", "✓".green(), report.git.program, path.cyan()),
        None => println!(
            "  {} {} not found on PATH",
            "✗".red(),
            report.git.program.yellow()
        ),
    }
    println!();

    println!("{}", "Configuration".bold().underline());
    if let Some(file) = &report.config.user {
        println!("  {} User config: {}", "✓".green(), file.cyan());
    }
    if let Some(file) = &report.config.project {
        println!("  {} Project config: {}", "✓".green(), file.cyan());
    }
    if !report.config.found {
        println!("  {} No config file found", "○".yellow());
        offer_config_creation()?;
    }
    println!("  {}: {}", "Log level".dimmed(), report.config.log_level);
    println!();

    println!("{}", "Directories".bold().underline());
    print_dir("  Config", report.directories.config.as_deref());
    print_dir("  Data (local)", report.directories.data_local.as_deref());
    println!();

    println!("{}", "Environment".bold().underline());
    println!("  {}: {}", "Repository".dimmed(), repo_dir.cyan());
    let set_vars: Vec<_> = report
        .environment
        .env_vars
        .iter()
        .filter(|v| v.value.is_some())
        .collect();
    if set_vars.is_empty() {
        println!("  {} No XDG/logging overrides set", "○".dimmed());
    }
    for var in set_vars {
        println!(
            "  {}: {}",
            var.name.dimmed(),
            var.value.as_deref().unwrap_or_default().cyan()
        );
    }

    Ok(())
}

fn print_dir(label: &str, path: Option<&str>) {
    match path {
        Some(p) => println!("{}: {}", label.dimmed(), p.cyan()),
        None => println!("{}: {}", label.dimmed(), "(unavailable)".yellow()),
    }
}

/// The config written by `doctor` when the user accepts: defaults plus an
/// explicit `git.program` so the key is discoverable.
fn starter_config() -> Config {
    Config {
        git: Some(GitConfig {
            program: Some(DEFAULT_PROGRAM.to_string()),
        }),
        ..Config::default()
    }
}

/// Offer to create a user config file when none exists.
///
/// Any existing `config.<ext>` counts, whatever its format.
fn offer_config_creation() -> anyhow::Result<()> {
    if config::find_user_config().is_some()
        || !std::io::IsTerminal::is_terminal(&std::io::stdin())
    {
        return Ok(());
    }
    let Some(config_dir) = config::user_config_dir() else {
        return Ok(());
    };
    let config_path = config_dir.join("config.yaml");

    let create = Confirm::new("Create a user config file?")
        .with_default(false)
        .with_help_message(&format!("Will create {config_path}"))
        .prompt();

    // Declined or interrupted prompts leave everything as is.
    if let Ok(true) = create {
        std::fs::create_dir_all(&config_dir)?;
        let yaml = serde_saphyr::to_string(&starter_config())?;
        std::fs::write(&config_path, yaml)?;
        println!("  {} Created {}", "✓".green(), config_path.cyan());
    }

    Ok(())
}
