//! Configuration error types.
//!
//! Git, version, and cleanup errors live next to the code that raises them:
//! [`crate::git::GitError`], [`crate::version::VersionError`],
//! [`crate::prune::PruneError`].

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A config file could not be read or had the wrong shape.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// A config file named on the command line does not exist.
    #[error("configuration file not found: {path}")]
    Missing {
        /// The path as given.
        path: Utf8PathBuf,
    },
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;
