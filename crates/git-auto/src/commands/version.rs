//! Version command.

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `version` subcommand.
#[derive(Args, Debug, Default)]
pub struct VersionArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

/// Print the package name and version.
#[instrument(name = "cmd_version", skip_all)]
pub fn cmd_version(_args: &VersionArgs, global_json: bool) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing version command");

    let info = PackageInfo::new();
    if global_json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("{} {}", info.name.bold(), info.version.green());
        if !info.description.is_empty() {
            println!("{}", info.description.dimmed());
        }
    }

    Ok(())
}
