//! Version tag parsing and increments.
//!
//! A version tag is `[v]<major>.<minor>.<patch>`. The `v` prefix is optional
//! and preserved: bumping `v1.1.1` yields `v1.1.2`, bumping `1.1.1` yields
//! `1.1.2`.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use semver::Version;
use thiserror::Error;

use crate::git::GitError;

/// Literal prefix some projects put in front of their version tags.
pub const VERSION_PREFIX: char = 'v';

static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").expect("version pattern compiles"));

/// Errors from version operations.
#[derive(Error, Debug)]
pub enum VersionError {
    /// No tag is reachable from `HEAD`, or describing failed.
    #[error("no tag found: {0}")]
    NoTagFound(#[source] GitError),

    /// The tag is not three dot-separated unsigned integers.
    #[error("does not match version: {tag}")]
    Malformed {
        /// The offending tag text.
        tag: String,
    },

    /// A git operation failed.
    #[error(transparent)]
    Git(#[from] GitError),
}

/// Result alias for version operations.
pub type VersionResult<T> = Result<T, VersionError>;

/// Semver bump level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpLevel {
    /// Patch release (x.y.Z).
    Patch,
    /// Minor release (x.Y.0).
    Minor,
    /// Major release (X.0.0).
    Major,
}

impl fmt::Display for BumpLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Patch => write!(f, "patch"),
            Self::Minor => write!(f, "minor"),
            Self::Major => write!(f, "major"),
        }
    }
}

/// What the next tag should be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Bump the latest tag by this level.
    Bump(BumpLevel),
    /// Use this text as the tag name as-is.
    ///
    /// Not validated: any string git accepts as a tag name goes through.
    Explicit(String),
}

impl FromStr for Target {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "major" => Self::Bump(BumpLevel::Major),
            "minor" => Self::Bump(BumpLevel::Minor),
            "patch" => Self::Bump(BumpLevel::Patch),
            other => Self::Explicit(other.to_string()),
        })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bump(level) => level.fmt(f),
            Self::Explicit(text) => f.write_str(text),
        }
    }
}

/// Compute the next version by applying a bump level.
///
/// Returns `None` if the bumped component would overflow.
pub fn next_version(current: &Version, level: BumpLevel) -> Option<Version> {
    Some(match level {
        BumpLevel::Patch => {
            Version::new(current.major, current.minor, current.patch.checked_add(1)?)
        }
        BumpLevel::Minor => Version::new(current.major, current.minor.checked_add(1)?, 0),
        BumpLevel::Major => Version::new(current.major.checked_add(1)?, 0, 0),
    })
}

/// Whether a tag starts with the `v` prefix.
pub fn has_version_prefix(tag: &str) -> bool {
    tag.starts_with(VERSION_PREFIX)
}

/// Remove a single leading `v`, if present.
pub fn strip_version_prefix(tag: &str) -> &str {
    tag.strip_prefix(VERSION_PREFIX).unwrap_or(tag)
}

/// A parsed version tag that remembers whether it carried the `v` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagVersion {
    /// Whether the tag text starts with `v`.
    pub prefixed: bool,
    /// The numeric version.
    pub version: Version,
}

impl TagVersion {
    /// Parse tag text as printed by git.
    ///
    /// Surrounding whitespace (git's trailing newline) is ignored. Anything
    /// else besides an optional leading `v` and three unsigned integers is
    /// rejected, as is a component too large for `u64`.
    pub fn parse(tag: &str) -> VersionResult<Self> {
        let tag = tag.trim();
        let malformed = || VersionError::Malformed {
            tag: tag.to_string(),
        };

        let prefixed = has_version_prefix(tag);
        let bare = strip_version_prefix(tag);
        if !VERSION_PATTERN.is_match(bare) {
            return Err(malformed());
        }

        let mut parts = bare.split('.').map(str::parse::<u64>);
        let (Some(Ok(major)), Some(Ok(minor)), Some(Ok(patch))) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };

        Ok(Self {
            prefixed,
            version: Version::new(major, minor, patch),
        })
    }

    /// Apply a bump level, keeping the prefix.
    pub fn bump(&self, level: BumpLevel) -> VersionResult<Self> {
        let version = next_version(&self.version, level).ok_or_else(|| VersionError::Malformed {
            tag: self.to_string(),
        })?;
        Ok(Self {
            prefixed: self.prefixed,
            version,
        })
    }
}

impl fmt::Display for TagVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prefixed {
            write!(f, "{VERSION_PREFIX}")?;
        }
        write!(
            f,
            "{}.{}.{}",
            self.version.major, self.version.minor, self.version.patch
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bumped(tag: &str, level: BumpLevel) -> String {
        TagVersion::parse(tag).unwrap().bump(level).unwrap().to_string()
    }

    #[test]
    fn bump_major() {
        assert_eq!(bumped("1.1.1", BumpLevel::Major), "2.0.0");
    }

    #[test]
    fn bump_minor() {
        assert_eq!(bumped("1.1.1", BumpLevel::Minor), "1.2.0");
    }

    #[test]
    fn bump_patch() {
        assert_eq!(bumped("1.1.1", BumpLevel::Patch), "1.1.2");
    }

    #[test]
    fn patch_twice_only_touches_patch() {
        let v = TagVersion::parse("3.7.9").unwrap();
        let twice = v
            .bump(BumpLevel::Patch)
            .and_then(|v| v.bump(BumpLevel::Patch))
            .unwrap();
        assert_eq!(twice.version, Version::new(3, 7, 11));
    }

    #[test]
    fn prefix_is_preserved() {
        assert_eq!(bumped("v1.1.1", BumpLevel::Patch), "v1.1.2");
        assert_eq!(bumped("v0.9.3", BumpLevel::Major), "v1.0.0");
    }

    #[test]
    fn prefix_round_trips() {
        let v = TagVersion::parse("v1.1.1").unwrap();
        assert!(v.prefixed);
        assert_eq!(v.to_string(), "v1.1.1");
        assert_eq!(TagVersion::parse("1.1.1").unwrap().to_string(), "1.1.1");
    }

    #[test]
    fn prefix_helpers() {
        assert!(has_version_prefix("v1.1.1"));
        assert!(!has_version_prefix("1.1.1"));
        assert_eq!(strip_version_prefix("v1.1.1"), "1.1.1");
        assert_eq!(strip_version_prefix("1.1.1"), "1.1.1");
    }

    #[test]
    fn trailing_newline_from_git_is_ignored() {
        assert_eq!(bumped("v1.0.0\n", BumpLevel::Minor), "v1.1.0");
    }

    #[test]
    fn malformed_tags_are_rejected() {
        for tag in ["v1.1.1aaa", "1.2", "1.2.3.4", "release-1.2.3", "1.-2.3", "", "v", "1 .2.3"] {
            let err = TagVersion::parse(tag).unwrap_err();
            assert!(
                matches!(err, VersionError::Malformed { .. }),
                "{tag:?} should be malformed, got {err:?}"
            );
        }
    }

    #[test]
    fn leading_zeros_parse_as_decimal() {
        assert_eq!(bumped("01.002.3", BumpLevel::Patch), "1.2.4");
    }

    #[test]
    fn oversized_component_is_malformed() {
        let err = TagVersion::parse("1.2.99999999999999999999999").unwrap_err();
        assert!(matches!(err, VersionError::Malformed { .. }));
    }

    #[test]
    fn bump_overflow_is_malformed() {
        let v = TagVersion::parse(&format!("1.2.{}", u64::MAX)).unwrap();
        assert!(matches!(
            v.bump(BumpLevel::Patch),
            Err(VersionError::Malformed { .. })
        ));
        assert!(v.bump(BumpLevel::Minor).is_ok());
    }

    #[test]
    fn target_from_keyword() {
        assert_eq!("major".parse(), Ok(Target::Bump(BumpLevel::Major)));
        assert_eq!("minor".parse(), Ok(Target::Bump(BumpLevel::Minor)));
        assert_eq!("patch".parse(), Ok(Target::Bump(BumpLevel::Patch)));
    }

    #[test]
    fn anything_else_is_explicit() {
        assert_eq!(
            "v2.0.0-rc1".parse(),
            Ok(Target::Explicit("v2.0.0-rc1".into()))
        );
        assert_eq!("Major".parse(), Ok(Target::Explicit("Major".into())));
    }

    #[test]
    fn target_display() {
        assert_eq!(Target::Bump(BumpLevel::Minor).to_string(), "minor");
        assert_eq!(Target::Explicit("1.0.0".into()).to_string(), "1.0.0");
    }

    #[test]
    fn malformed_error_names_tag() {
        let err = TagVersion::parse("v1.1.1aaa").unwrap_err();
        assert_eq!(err.to_string(), "does not match version: v1.1.1aaa");
    }
}
