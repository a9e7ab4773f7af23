//! Tag creation: compute the next version, tag it, optionally push it.
//!
//! Steps run strictly in order and stop at the first failure. Nothing is
//! rolled back: if the push fails, the local tag stays.

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::git::{DEFAULT_REMOTE, Gateway};
use crate::version::{TagVersion, Target, VersionError, VersionResult};

/// Everything needed for one `version_up` run.
#[derive(Debug, Clone)]
pub struct TagRequest {
    /// Bump level or explicit tag name.
    pub target: Target,
    /// Annotation message. Empty or `None` creates a lightweight tag.
    pub message: Option<String>,
    /// Push the new tag to `origin` after creating it.
    pub push: bool,
}

impl TagRequest {
    /// A lightweight, local-only tag request.
    pub const fn new(target: Target) -> Self {
        Self {
            target,
            message: None,
            push: false,
        }
    }

    /// Attach an annotation message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Request a push after tagging.
    #[must_use]
    pub const fn with_push(mut self, push: bool) -> Self {
        self.push = push;
        self
    }

    fn annotation(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }
}

/// Result of a successful `version_up`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagOutcome {
    /// The tag that was created.
    pub version: String,
    /// The tag it was bumped from (`None` for explicit targets).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    /// Whether an annotated tag was created.
    pub annotated: bool,
    /// Whether the tag was pushed.
    pub pushed: bool,
}

/// Work out the tag name for `target` without changing the repository.
///
/// Returns `(previous, next)`. Keyword targets read the latest tag;
/// explicit targets are returned untouched.
#[instrument(skip(git))]
pub fn next_tag<G: Gateway + ?Sized>(
    git: &G,
    target: &Target,
) -> VersionResult<(Option<String>, String)> {
    match target {
        Target::Bump(level) => {
            let raw = git.latest_tag().map_err(VersionError::NoTagFound)?;
            let current = TagVersion::parse(&raw)?;
            let next = current.bump(*level)?;
            debug!(%current, %next, %level, "computed next version");
            Ok((Some(current.to_string()), next.to_string()))
        }
        Target::Explicit(text) => {
            debug!(version = %text, "using explicit version");
            Ok((None, text.clone()))
        }
    }
}

/// Create the next version tag and optionally push it.
///
/// # Errors
///
/// - [`VersionError::NoTagFound`] if a keyword target has no tag to bump.
/// - [`VersionError::Malformed`] if that tag is not `[v]X.Y.Z`; no tag is
///   created in that case.
/// - [`VersionError::Git`] with git's message if tagging or pushing fails.
#[instrument(skip(git, request), fields(target = %request.target, push = request.push))]
pub fn version_up<G: Gateway + ?Sized>(git: &G, request: &TagRequest) -> VersionResult<TagOutcome> {
    let (previous, version) = next_tag(git, &request.target)?;

    let annotation = request.annotation();
    git.create_tag(&version, annotation)?;
    info!(%version, annotated = annotation.is_some(), "created tag");

    if request.push {
        git.push_tag(DEFAULT_REMOTE, &version)?;
        info!(%version, remote = DEFAULT_REMOTE, "pushed tag");
    }

    Ok(TagOutcome {
        version,
        previous,
        annotated: annotation.is_some(),
        pushed: request.push,
    })
}
