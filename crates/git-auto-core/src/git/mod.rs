//! Git gateway for tagging and branch cleanup.
//!
//! Every repository interaction goes through the [`Gateway`] trait. The
//! production implementation, [`SystemGit`], shells out to `git` so we inherit
//! the user's SSH keys, GPG signing, hooks, and other configuration.
//! [`fake::FakeGit`] replays scripted outputs for tests.

pub mod fake;
mod system;

use std::path::PathBuf;

use thiserror::Error;

pub use system::SystemGit;

/// Executable used when no override is configured.
pub const DEFAULT_PROGRAM: &str = "git";

/// Remote that tags are pushed to.
pub const DEFAULT_REMOTE: &str = "origin";

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    /// Failed to launch the `git` executable.
    #[error("failed to run git: {0}")]
    Exec(#[from] std::io::Error),

    /// `git` returned a non-zero exit code.
    ///
    /// Displays git's stderr with surrounding whitespace trimmed. When git
    /// writes nothing to stderr the text is `git exited with <status>`.
    #[error("{stderr}")]
    Command {
        /// The git subcommand that failed (e.g., "describe").
        command: String,
        /// Captured stderr.
        stderr: String,
    },
}

/// Result alias for git operations.
pub type GitResult<T> = Result<T, GitError>;

/// A single git invocation and the exact argument vector it sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// `describe --tags --abbrev=0`
    LatestTag,
    /// `tag <name>` or `tag -am <message> <name>`
    CreateTag {
        /// Tag name.
        name: String,
        /// Annotation message; `None` creates a lightweight tag.
        message: Option<String>,
    },
    /// `push <remote> <name>`
    PushTag {
        /// Remote name.
        remote: String,
        /// Tag name.
        name: String,
    },
    /// `branch --merged`
    MergedBranches,
    /// `branch -D <name>`
    DeleteBranch {
        /// Branch name.
        name: String,
    },
}

impl Invocation {
    /// Argument vector passed to the git executable.
    ///
    /// Names and messages are discrete arguments, never joined into a shell
    /// string.
    pub fn args(&self) -> Vec<&str> {
        match self {
            Self::LatestTag => vec!["describe", "--tags", "--abbrev=0"],
            Self::CreateTag {
                name,
                message: None,
            } => vec!["tag", name.as_str()],
            Self::CreateTag {
                name,
                message: Some(message),
            } => vec!["tag", "-am", message.as_str(), name.as_str()],
            Self::PushTag { remote, name } => vec!["push", remote.as_str(), name.as_str()],
            Self::MergedBranches => vec!["branch", "--merged"],
            Self::DeleteBranch { name } => vec!["branch", "-D", name.as_str()],
        }
    }
}

/// Repository operations needed by the version engine and branch pruner.
///
/// Implementations must not retry or roll back: each call either succeeds or
/// reports the failure of that one git invocation.
pub trait Gateway {
    /// Most recent tag reachable from `HEAD`, as printed by git.
    fn latest_tag(&self) -> GitResult<String>;

    /// Create a tag at `HEAD`. Annotated when `message` is `Some`.
    fn create_tag(&self, name: &str, message: Option<&str>) -> GitResult<()>;

    /// Push a single tag to `remote`.
    fn push_tag(&self, remote: &str, name: &str) -> GitResult<()>;

    /// Raw `git branch --merged` output, one branch per line.
    fn merged_branches(&self) -> GitResult<String>;

    /// Force-delete a local branch.
    fn delete_branch(&self, name: &str) -> GitResult<()>;
}

/// Resolve a git executable name or path the way the OS would launch it.
///
/// Returns `None` if nothing on `PATH` matches.
pub fn locate(program: &str) -> Option<PathBuf> {
    which::which(program).ok()
}
