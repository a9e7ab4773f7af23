//! Core library for git-auto.
//!
//! Semver tagging and merged-branch cleanup, driven through the git
//! executable. Everything that touches a repository goes through the
//! [`git::Gateway`] trait, so the logic here can run against a scripted
//! [`git::fake::FakeGit`] as easily as a real checkout.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading and management
//! - [`error`] - Configuration error types
//! - [`git`] - The gateway trait and the subprocess implementation
//! - [`prune`] - Deleting merged branches
//! - [`tag`] - Creating (and pushing) the next version tag
//! - [`version`] - Version tag parsing and increments
//!
//! # Quick Start
//!
//! ```no_run
//! use git_auto_core::git::SystemGit;
//! use git_auto_core::tag::{TagRequest, version_up};
//! use git_auto_core::version::{BumpLevel, Target};
//!
//! let git = SystemGit::new("/path/to/repo");
//! let outcome = version_up(&git, &TagRequest::new(Target::Bump(BumpLevel::Minor)))
//!     .expect("tagging failed");
//! println!("created {}", outcome.version);
//! ```
#![deny(unsafe_code)]

pub mod config;

pub mod error;

pub mod git;

pub mod prune;

pub mod tag;

pub mod version;

pub use config::{Config, ConfigLoader, LogLevel};

pub use error::{ConfigError, ConfigResult};

// Re-export semver so downstream crates don't need a direct dependency.
pub use semver;
