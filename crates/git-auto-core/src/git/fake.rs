//! Scripted gateway for tests.

use std::cell::RefCell;
use std::collections::HashMap;

use super::{Gateway, GitError, GitResult, Invocation};

/// In-memory gateway that returns scripted output and records every call.
///
/// Unscripted queries behave like an empty repository: `latest_tag` fails the
/// way `git describe` does without tags, and `merged_branches` is empty.
/// Mutating calls succeed unless a failure was scripted for them.
#[derive(Debug, Default)]
pub struct FakeGit {
    latest_tag: Option<String>,
    merged: String,
    create_failure: Option<String>,
    push_failure: Option<String>,
    delete_failures: HashMap<String, String>,
    calls: RefCell<Vec<Invocation>>,
}

impl FakeGit {
    /// Create a fake with no tags and no merged branches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the output of `git describe --tags --abbrev=0`.
    ///
    /// Include the trailing newline to mirror real git output.
    #[must_use]
    pub fn with_latest_tag(mut self, tag: impl Into<String>) -> Self {
        self.latest_tag = Some(tag.into());
        self
    }

    /// Script the raw output of `git branch --merged`.
    #[must_use]
    pub fn with_merged_branches(mut self, raw: impl Into<String>) -> Self {
        self.merged = raw.into();
        self
    }

    /// Make tag creation fail with the given stderr.
    #[must_use]
    pub fn failing_create_tag(mut self, stderr: impl Into<String>) -> Self {
        self.create_failure = Some(stderr.into());
        self
    }

    /// Make tag push fail with the given stderr.
    #[must_use]
    pub fn failing_push(mut self, stderr: impl Into<String>) -> Self {
        self.push_failure = Some(stderr.into());
        self
    }

    /// Make deleting `branch` fail with the given stderr.
    #[must_use]
    pub fn failing_delete(mut self, branch: impl Into<String>, stderr: impl Into<String>) -> Self {
        self.delete_failures.insert(branch.into(), stderr.into());
        self
    }

    /// Every invocation received so far, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Whether any tag creation was attempted.
    pub fn created_tag(&self) -> bool {
        self.calls
            .borrow()
            .iter()
            .any(|call| matches!(call, Invocation::CreateTag { .. }))
    }

    fn record(&self, invocation: Invocation) -> Invocation {
        self.calls.borrow_mut().push(invocation.clone());
        invocation
    }

    fn fail(invocation: &Invocation, stderr: &str) -> GitError {
        GitError::Command {
            command: invocation.args().first().unwrap_or(&"").to_string(),
            stderr: stderr.to_string(),
        }
    }
}

impl Gateway for FakeGit {
    fn latest_tag(&self) -> GitResult<String> {
        let call = self.record(Invocation::LatestTag);
        self.latest_tag.clone().ok_or_else(|| {
            Self::fail(&call, "fatal: No names found, cannot describe anything.")
        })
    }

    fn create_tag(&self, name: &str, message: Option<&str>) -> GitResult<()> {
        let call = self.record(Invocation::CreateTag {
            name: name.to_string(),
            message: message.map(str::to_string),
        });
        match &self.create_failure {
            Some(stderr) => Err(Self::fail(&call, stderr)),
            None => Ok(()),
        }
    }

    fn push_tag(&self, remote: &str, name: &str) -> GitResult<()> {
        let call = self.record(Invocation::PushTag {
            remote: remote.to_string(),
            name: name.to_string(),
        });
        match &self.push_failure {
            Some(stderr) => Err(Self::fail(&call, stderr)),
            None => Ok(()),
        }
    }

    fn merged_branches(&self) -> GitResult<String> {
        self.record(Invocation::MergedBranches);
        Ok(self.merged.clone())
    }

    fn delete_branch(&self, name: &str) -> GitResult<()> {
        let call = self.record(Invocation::DeleteBranch {
            name: name.to_string(),
        });
        match self.delete_failures.get(name) {
            Some(stderr) => Err(Self::fail(&call, stderr)),
            None => Ok(()),
        }
    }
}
