use std::process::Command;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, instrument};

use super::{DEFAULT_PROGRAM, Gateway, GitError, GitResult, Invocation};

/// Gateway that runs the git executable in a fixed repository directory.
///
/// Each call spawns a fresh child process and blocks until it exits. There is
/// no timeout.
#[derive(Debug, Clone)]
pub struct SystemGit {
    program: String,
    repo_dir: Utf8PathBuf,
}

impl SystemGit {
    /// Operate on the repository at `repo_dir` using `git` from `PATH`.
    pub fn new(repo_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            repo_dir: repo_dir.into(),
        }
    }

    /// Use a different git executable (name on `PATH` or absolute path).
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// The git executable this gateway launches.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Directory every git command runs in.
    pub fn repo_dir(&self) -> &Utf8Path {
        &self.repo_dir
    }

    #[instrument(skip(self), fields(repo = %self.repo_dir))]
    fn invoke(&self, invocation: &Invocation) -> GitResult<String> {
        self.run(&invocation.args())
    }

    /// Run a git command and return its stdout.
    fn run(&self, args: &[&str]) -> GitResult<String> {
        let output = Command::new(&self.program)
            .args(args)
            .current_dir(&self.repo_dir)
            .output()?;

        if output.status.success() {
            debug!(?args, "git succeeded");
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            let mut stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if stderr.is_empty() {
                stderr = format!("git exited with {}", output.status);
            }
            debug!(?args, %stderr, "git failed");

            Err(GitError::Command {
                command: args.first().unwrap_or(&"").to_string(),
                stderr,
            })
        }
    }
}

impl Gateway for SystemGit {
    fn latest_tag(&self) -> GitResult<String> {
        self.invoke(&Invocation::LatestTag)
    }

    fn create_tag(&self, name: &str, message: Option<&str>) -> GitResult<()> {
        self.invoke(&Invocation::CreateTag {
            name: name.to_string(),
            message: message.map(str::to_string),
        })?;
        Ok(())
    }

    fn push_tag(&self, remote: &str, name: &str) -> GitResult<()> {
        self.invoke(&Invocation::PushTag {
            remote: remote.to_string(),
            name: name.to_string(),
        })?;
        Ok(())
    }

    fn merged_branches(&self) -> GitResult<String> {
        self.invoke(&Invocation::MergedBranches)
    }

    fn delete_branch(&self, name: &str) -> GitResult<()> {
        self.invoke(&Invocation::DeleteBranch {
            name: name.to_string(),
        })?;
        Ok(())
    }
}
