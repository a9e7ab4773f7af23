//! Merged-branch cleanup.
//!
//! Lists branches merged into the current branch, drops protected ones, and
//! force-deletes the rest in git's output order.
//!
//! The protection check is a substring match, not an exact name match: any
//! branch whose name *contains* `main`, `master`, `development`, `staging`,
//! or `production` is kept, so `feature/production-fix` survives too.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::git::{Gateway, GitError};

/// Long-lived branch names that are never deleted.
pub const PROTECTED_BRANCHES: &[&str] =
    &["main", "master", "development", "staging", "production"];

/// Prefix `git branch` puts on the checked-out branch.
pub const CURRENT_BRANCH_MARKER: char = '*';

static PROTECTED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let marker = regex::escape(&CURRENT_BRANCH_MARKER.to_string());
    let names = PROTECTED_BRANCHES.join("|");
    Regex::new(&format!("^{marker}|{names}")).expect("protected branch pattern compiles")
});

/// Errors from branch cleanup.
#[derive(Error, Debug)]
pub enum PruneError {
    /// Listing merged branches failed.
    #[error("failed to list merged branches: {0}")]
    List(#[source] GitError),

    /// Deleting a branch failed. Branches before it are already gone.
    #[error("failed to delete branch '{branch}': {source}")]
    Delete {
        /// The branch that could not be deleted.
        branch: String,
        /// Branches deleted before the failure, in order.
        deleted: Vec<String>,
        /// Git's error.
        #[source]
        source: GitError,
    },
}

/// Result alias for branch cleanup.
pub type PruneResult<T> = Result<T, PruneError>;

/// Branches removed by a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PruneOutcome {
    /// Deleted branch names, in deletion order.
    pub deleted: Vec<String>,
}

/// Whether a `git branch` line (whitespace already removed) must be kept.
pub fn is_protected(branch: &str) -> bool {
    PROTECTED_PATTERN.is_match(branch)
}

/// Pick the deletable branches out of raw `git branch --merged` output.
///
/// All whitespace inside each line is removed before matching; empty lines
/// and protected branches are dropped. Order is preserved.
pub fn merged_branch_candidates(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| line.split_whitespace().collect::<String>())
        .filter(|branch| !branch.is_empty() && !is_protected(branch))
        .collect()
}

/// Delete every merged, unprotected local branch.
///
/// Stops at the first failed deletion; later branches are left alone and
/// earlier deletions are not undone.
#[instrument(skip(git))]
pub fn delete_merged_branches<G: Gateway + ?Sized>(git: &G) -> PruneResult<PruneOutcome> {
    let raw = git.merged_branches().map_err(PruneError::List)?;
    let candidates = merged_branch_candidates(&raw);
    debug!(count = candidates.len(), ?candidates, "merged branches to delete");

    let mut deleted = Vec::with_capacity(candidates.len());
    for branch in candidates {
        if let Err(source) = git.delete_branch(&branch) {
            return Err(PruneError::Delete {
                branch,
                deleted,
                source,
            });
        }
        info!(%branch, "deleted branch");
        deleted.push(branch);
    }

    Ok(PruneOutcome { deleted })
}
