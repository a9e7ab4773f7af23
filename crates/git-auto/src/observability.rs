//! Structured logging to JSONL files.
//!
//! stdout belongs to command output (including `--json`), so log records only
//! ever go to a file, or to stderr when no file can be opened.
//!
//! Log file resolution, first match wins:
//! 1. `GIT_AUTO_LOG_PATH` (full file path)
//! 2. `GIT_AUTO_LOG_DIR` (directory; file is `git-auto.jsonl`)
//! 3. `log_dir` from configuration
//! 4. `logs/` under the platform data dir, then the system temp dir
//!
//! The working directory is never a candidate: it is usually a repository and
//! a stray log file would show up as untracked.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const ENV_LOG_PATH: &str = "GIT_AUTO_LOG_PATH";
const ENV_LOG_DIR: &str = "GIT_AUTO_LOG_DIR";
const LOG_FILE_SUFFIX: &str = ".jsonl";

/// Where and under which name to write logs.
#[derive(Clone, Debug)]
pub struct ObservabilityConfig {
    /// Service name; also the log file stem.
    pub service: String,
    /// Directory from configuration, used when no env override is set.
    pub log_dir: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Config for this binary with an optional configured log directory.
    pub fn new(log_dir: Option<PathBuf>) -> Self {
        Self {
            service: env!("CARGO_PKG_NAME").to_string(),
            log_dir,
        }
    }
}

/// Keeps the background log writer alive; drop it last so buffered records
/// are flushed.
pub struct ObservabilityGuard {
    _log_guard: WorkerGuard,
}

/// Install the global subscriber.
///
/// Falls back to stderr (with a warning) when no log file is writable.
pub fn init_observability(
    cfg: &ObservabilityConfig,
    env_filter: EnvFilter,
) -> Result<ObservabilityGuard> {
    let (writer, guard) = match file_writer(&cfg.service, cfg.log_dir.as_deref()) {
        Ok(pair) => pair,
        Err(err) => {
            eprintln!("Warning: {err:#}. Falling back to stderr logging.");
            tracing_appender::non_blocking(std::io::stderr())
        }
    };

    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(false)
        .with_ansi(false)
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    tracing::debug!("observability initialized");

    Ok(ObservabilityGuard { _log_guard: guard })
}

/// Build the level filter.
///
/// `-q` beats `-v`, which beats `RUST_LOG`, which beats the configured level.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }

    match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

fn file_writer(service: &str, config_dir: Option<&Path>) -> Result<(NonBlocking, WorkerGuard)> {
    let target = resolve_log_target(
        service,
        std::env::var_os(ENV_LOG_PATH).map(PathBuf::from),
        std::env::var_os(ENV_LOG_DIR).map(PathBuf::from),
        config_dir.map(Path::to_path_buf),
    )?;

    let appender = tracing_appender::rolling::daily(&target.dir, &target.file_name);
    Ok(tracing_appender::non_blocking(appender))
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct LogTarget {
    dir: PathBuf,
    file_name: String,
}

fn resolve_log_target(
    service: &str,
    path_override: Option<PathBuf>,
    dir_override: Option<PathBuf>,
    config_dir: Option<PathBuf>,
) -> Result<LogTarget> {
    if let Some(path) = path_override {
        return target_from_path(&path);
    }

    let file_name = format!("{service}{LOG_FILE_SUFFIX}");

    if let Some(dir) = dir_override.or(config_dir) {
        ensure_writable(&dir, &file_name)?;
        return Ok(LogTarget { dir, file_name });
    }

    let candidates = git_auto_core::config::user_data_local_dir()
        .map(|dir| dir.join("logs").into_std_path_buf())
        .into_iter()
        .chain(std::iter::once(std::env::temp_dir()));

    for dir in candidates {
        if ensure_writable(&dir, &file_name).is_ok() {
            return Ok(LogTarget { dir, file_name });
        }
    }

    bail!("no writable log directory found")
}

fn target_from_path(path: &Path) -> Result<LogTarget> {
    let Some(file_name) = path.file_name() else {
        bail!("{ENV_LOG_PATH} must include a file name");
    };
    let Some(file_name) = file_name.to_str() else {
        bail!("{ENV_LOG_PATH} must be valid UTF-8");
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    ensure_writable(dir, file_name)?;

    Ok(LogTarget {
        dir: dir.to_path_buf(),
        file_name: file_name.to_string(),
    })
}

fn ensure_writable(dir: &Path, file_name: &str) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    let path = dir.join(file_name);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn quiet_wins_over_verbose() {
        assert_eq!(env_filter(true, 2, "info").to_string(), "error");
    }

    #[test]
    fn verbose_levels() {
        assert_eq!(env_filter(false, 1, "info").to_string(), "debug");
        assert_eq!(env_filter(false, 3, "info").to_string(), "trace");
    }

    #[test]
    fn path_override_splits_dir_and_name() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("custom.jsonl");

        let target = resolve_log_target("git-auto", Some(path), None, None).unwrap();
        assert_eq!(target.dir, tmp.path().join("nested"));
        assert_eq!(target.file_name, "custom.jsonl");
        assert!(target.dir.join("custom.jsonl").is_file());
    }

    #[test]
    fn path_override_beats_dir_override() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.jsonl");
        let dir = tmp.path().join("other");

        let target = resolve_log_target("git-auto", Some(path), Some(dir), None).unwrap();
        assert_eq!(target.file_name, "a.jsonl");
    }

    #[test]
    fn dir_override_beats_config_dir() {
        let tmp = TempDir::new().unwrap();
        let env_dir = tmp.path().join("env");
        let config_dir = tmp.path().join("config");

        let target =
            resolve_log_target("git-auto", None, Some(env_dir.clone()), Some(config_dir)).unwrap();
        assert_eq!(target.dir, env_dir);
        assert_eq!(target.file_name, "git-auto.jsonl");
    }

    #[test]
    fn config_dir_used_without_env() {
        let tmp = TempDir::new().unwrap();
        let target =
            resolve_log_target("demo", None, None, Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(
            target,
            LogTarget {
                dir: tmp.path().to_path_buf(),
                file_name: "demo.jsonl".into(),
            }
        );
    }

    #[test]
    fn default_candidates_resolve_somewhere() {
        let target = resolve_log_target("git-auto-test", None, None, None).unwrap();
        assert_eq!(target.file_name, "git-auto-test.jsonl");
    }

    #[test]
    fn path_without_file_name_is_rejected() {
        let err = target_from_path(Path::new("/")).unwrap_err();
        assert!(err.to_string().contains(ENV_LOG_PATH));
    }
}
