//! Configuration loading and discovery.
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. User config: `config.<ext>` in the XDG config dir (`~/.config/git-auto/`)
//! 3. Project config: `.git-auto.<ext>` or `git-auto.<ext>`, searched from the
//!    repository directory upward, up to and including the repository root
//! 4. Explicit files passed with `--config`
//!
//! Where `<ext>` is one of `toml`, `yaml`, `yml`, `json`.
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use git_auto_core::config::ConfigLoader;
//!
//! let repo = Utf8PathBuf::from("/path/to/repo");
//! let config = ConfigLoader::new().with_repo_search(&repo).load().unwrap();
//! println!("git: {}", config.git_program());
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{ConfigError, ConfigResult};
use crate::git::DEFAULT_PROGRAM;

/// Supported configuration file extensions (in order of preference).
const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Application name for XDG directory lookup and config file names.
const APP_NAME: &str = "git-auto";

/// Directory entry that marks a repository root and ends the upward search.
const REPO_MARKER: &str = ".git";

/// The configuration for git-auto.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Log level when neither `-v`/`-q` nor `RUST_LOG` is given.
    pub log_level: LogLevel,
    /// Directory for JSONL log files (falls back to platform defaults if unset).
    pub log_dir: Option<Utf8PathBuf>,
    /// Git executable settings.
    pub git: Option<GitConfig>,
}

impl Config {
    /// The git executable to launch: `[git] program`, or `git` from `PATH`.
    pub fn git_program(&self) -> &str {
        self.git
            .as_ref()
            .and_then(|g| g.program.as_deref())
            .unwrap_or(DEFAULT_PROGRAM)
    }
}

/// `[git]` section.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct GitConfig {
    /// Name on `PATH` or absolute path of the git executable.
    pub program: Option<String>,
}

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Builder for loading configuration from multiple sources.
#[derive(Debug)]
pub struct ConfigLoader {
    repo_dir: Option<Utf8PathBuf>,
    include_user_config: bool,
    explicit_files: Vec<Utf8PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// A loader that reads user config and nothing else until told where to look.
    pub const fn new() -> Self {
        Self {
            repo_dir: None,
            include_user_config: true,
            explicit_files: Vec::new(),
        }
    }

    /// Search for project config starting at `dir`.
    pub fn with_repo_search<P: AsRef<Utf8Path>>(mut self, dir: P) -> Self {
        self.repo_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set whether to include user config from the XDG config directory.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Add an explicit config file. Later files win.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration, merging all discovered sources.
    ///
    /// An explicit file that does not exist is an error; discovered files are
    /// only merged when present.
    #[instrument(skip(self), fields(repo = ?self.repo_dir))]
    pub fn load(self) -> ConfigResult<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if self.include_user_config
            && let Some(user_config) = find_user_config()
        {
            debug!(path = %user_config, "merging user config");
            figment = merge_file(figment, &user_config);
        }

        if let Some(project_config) = self.repo_dir.as_deref().and_then(find_project_config) {
            debug!(path = %project_config, "merging project config");
            figment = merge_file(figment, &project_config);
        }

        for file in &self.explicit_files {
            if !file.is_file() {
                return Err(ConfigError::Missing { path: file.clone() });
            }
            debug!(path = %file, "merging explicit config");
            figment = merge_file(figment, file);
        }

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        debug!(
            log_level = config.log_level.as_str(),
            git = config.git_program(),
            "configuration loaded"
        );
        Ok(config)
    }
}

/// Find the project config file that applies to `start`.
///
/// Walks up from `start`, checking each directory for `.git-auto.<ext>`
/// then `git-auto.<ext>`. The walk ends after the first directory that
/// contains `.git`, so config above the repository root is never picked up.
pub fn find_project_config<P: AsRef<Utf8Path>>(start: P) -> Option<Utf8PathBuf> {
    for dir in start.as_ref().ancestors() {
        for ext in CONFIG_EXTENSIONS {
            for name in [format!(".{APP_NAME}.{ext}"), format!("{APP_NAME}.{ext}")] {
                let candidate = dir.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }

        if dir.join(REPO_MARKER).exists() {
            break;
        }
    }

    None
}

/// Find the user config file (`config.<ext>` in [`user_config_dir`]).
///
/// Extensions are tried in the same order the loader uses, so this is the
/// file [`ConfigLoader`] merges when user config is enabled.
pub fn find_user_config() -> Option<Utf8PathBuf> {
    let config_dir = user_config_dir()?;
    CONFIG_EXTENSIONS
        .iter()
        .map(|ext| config_dir.join(format!("config.{ext}")))
        .find(|path| path.is_file())
}

/// Merge a config file into the figment, detecting format from extension.
fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
    match path.extension() {
        Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
        Some("json") => figment.merge(Json::file_exact(path.as_str())),
        _ => figment.merge(Toml::file_exact(path.as_str())),
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
}

/// User config directory (`~/.config/git-auto/` on Linux).
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = project_dirs()?;
    Utf8PathBuf::from_path_buf(proj_dirs.config_dir().to_path_buf()).ok()
}

/// Machine-local data directory (`~/.local/share/git-auto/` on Linux).
///
/// Log files land in `logs/` under it when no log directory is configured.
pub fn user_data_local_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = project_dirs()?;
    Utf8PathBuf::from_path_buf(proj_dirs.data_local_dir().to_path_buf()).ok()
}
