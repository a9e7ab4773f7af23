//! git-auto CLI
#![deny(unsafe_code)]

use std::path::Path;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Parser;
use git_auto::{Cli, Commands, commands};
use git_auto_core::config::ConfigLoader;
use git_auto_core::git::SystemGit;
use tracing::debug;

mod observability;

fn utf8(path: &Path, what: &str) -> anyhow::Result<Utf8PathBuf> {
    Utf8PathBuf::try_from(path.to_path_buf())
        .map_err(|e| anyhow::anyhow!("{what} is not valid UTF-8: {}", e.into_path_buf().display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.color.apply();

    // `-C` is resolved against the cwd and handed to every git call; the
    // process working directory itself never changes.
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let repo_dir = match cli.chdir {
        Some(ref dir) => cwd.join(dir),
        None => cwd,
    };
    if !repo_dir.is_dir() {
        anyhow::bail!("not a directory: {}", repo_dir.display());
    }
    let repo_dir = utf8(&repo_dir, "repository directory")?;

    let mut loader = ConfigLoader::new().with_repo_search(&repo_dir);
    if let Some(ref config_path) = cli.config {
        loader = loader.with_file(utf8(config_path, "config path")?);
    }
    let config = loader.load().context("failed to load configuration")?;

    let obs_config = observability::ObservabilityConfig::new(
        config.log_dir.as_ref().map(|dir| dir.as_std_path().to_path_buf()),
    );
    let env_filter = observability::env_filter(cli.quiet, cli.verbose, config.log_level.as_str());
    let _guard = observability::init_observability(&obs_config, env_filter)
        .context("failed to initialize logging")?;

    debug!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        json = cli.json,
        color = ?cli.color,
        repo = %repo_dir,
        "CLI initialized"
    );

    let git = SystemGit::new(repo_dir.clone()).with_program(config.git_program());

    let result = match cli.command {
        Commands::Tag(ref args) => commands::tag::cmd_tag(args, cli.json, &git),
        Commands::DeleteMergedBranch(ref args) => {
            commands::delete_merged_branch::cmd_delete_merged_branch(args, cli.json, &git)
        }
        Commands::Version(ref args) => commands::version::cmd_version(args, cli.json),
        Commands::Doctor(ref args) => {
            commands::doctor::cmd_doctor(args, cli.json, &config, &repo_dir)
        }
    };
    if let Err(ref err) = result {
        tracing::error!(error = %format!("{err:#}"), "fatal error");
    }
    result
}
