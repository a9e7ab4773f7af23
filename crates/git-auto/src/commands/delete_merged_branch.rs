//! Delete-merged-branch command.

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use git_auto_core::git::Gateway;
use git_auto_core::prune::{PruneError, delete_merged_branches};

/// Arguments for the `delete-merged-branch` subcommand.
#[derive(Args, Debug, Default)]
pub struct DeleteMergedBranchArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct Report<'a> {
    deleted: &'a [String],
}

/// Delete merged branches and list what went.
///
/// On a mid-run failure the branches already deleted are still reported
/// before the error is returned.
#[instrument(name = "cmd_delete_merged_branch", skip_all)]
pub fn cmd_delete_merged_branch<G: Gateway + ?Sized>(
    _args: &DeleteMergedBranchArgs,
    global_json: bool,
    git: &G,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing delete-merged-branch command");

    match delete_merged_branches(git) {
        Ok(outcome) => {
            report(&outcome.deleted, global_json)?;
            Ok(())
        }
        Err(err) => {
            if let PruneError::Delete { deleted, .. } = &err
                && !deleted.is_empty()
            {
                report(deleted, global_json)?;
            }
            Err(err.into())
        }
    }
}

fn report(deleted: &[String], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&Report { deleted })?);
        return Ok(());
    }

    if deleted.is_empty() {
        println!("{} No merged branches to delete", "○".dimmed());
    }
    for branch in deleted {
        println!("{} Deleted {}", "✓".green(), branch.cyan());
    }
    Ok(())
}
