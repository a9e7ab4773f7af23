//! End-to-end CLI integration tests
//!
//! These tests invoke the compiled binary as a subprocess to verify
//! that the CLI behaves correctly from a user's perspective.

use std::path::Path;
use std::process::Command as StdCommand;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Returns a Command configured to run our binary, with logs and user
/// config kept out of the real home directory.
#[allow(deprecated)]
fn cmd() -> Command {
    let sandbox = std::env::temp_dir().join("git-auto-cli-tests");
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.env("GIT_AUTO_LOG_DIR", sandbox.join("logs"))
        .env("XDG_CONFIG_HOME", sandbox.join("config"))
        .env_remove("RUST_LOG");
    cmd
}

fn git_available() -> bool {
    git_auto_core::git::locate("git").is_some()
}

fn git(dir: &Path, args: &[&str]) -> String {
    let output = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// A repository on `main` with one commit.
fn init_repo() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    git(dir, &["init", "-q"]);
    git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(dir, &["config", "user.name", "Test User"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
    git(dir, &["config", "tag.gpgsign", "false"]);
    git(dir, &["commit", "-q", "--allow-empty", "-m", "initial"]);
    tmp
}

fn path_arg(tmp: &TempDir) -> &str {
    tmp.path().to_str().unwrap()
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_shows_usage() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("tag"))
        .stdout(predicate::str::contains("delete-merged-branch"));
}

#[test]
fn long_help_lists_env_vars() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("GIT_AUTO_LOG_DIR"));
}

#[test]
fn version_flag_shows_version() {
    cmd()
        .arg("-V")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_command_prints_version() {
    cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("git-auto"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_json_outputs_valid_json() {
    let output = cmd().args(["version", "--json"]).assert().success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("version --json should output valid JSON");
    assert_eq!(json["name"], "git-auto");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

// =============================================================================
// Usage Errors
// =============================================================================

#[test]
fn tag_without_target_is_usage_error() {
    cmd()
        .arg("tag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("VERSION_OR_KEYWORD"));
}

#[test]
fn no_subcommand_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn invalid_subcommand_shows_error() {
    cmd()
        .arg("not-a-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn chdir_nonexistent_fails() {
    cmd()
        .args(["-C", "/nonexistent/path/that/does/not/exist", "version"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}

// =============================================================================
// Global Flags
// =============================================================================

#[test]
fn global_flags_accepted() {
    for flags in [
        &["-q"][..],
        &["-v"],
        &["-vv"],
        &["--color", "never"],
        &["--color", "always"],
    ] {
        cmd().args(flags).arg("version").assert().success();
    }
}

// =============================================================================
// Tag
// =============================================================================

#[test]
fn tag_minor_in_repository() {
    if !git_available() {
        return;
    }
    let repo = init_repo();
    git(repo.path(), &["tag", "v1.1.1"]);

    cmd()
        .args(["-C", path_arg(&repo), "--color", "never", "tag", "minor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("v1.2.0"));

    assert!(git(repo.path(), &["tag", "--list"]).contains("v1.2.0"));
}

#[test]
fn tag_json_reports_outcome() {
    if !git_available() {
        return;
    }
    let repo = init_repo();
    git(repo.path(), &["tag", "1.0.0"]);

    let output = cmd()
        .args(["-C", path_arg(&repo), "--json", "tag", "major", "-m", "breaking"])
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_slice(&output.get_output().stdout).expect("valid JSON");
    assert_eq!(json["version"], "2.0.0");
    assert_eq!(json["previous"], "1.0.0");
    assert_eq!(json["annotated"], true);
    assert_eq!(json["pushed"], false);
}

#[test]
fn tag_malformed_fails_without_creating() {
    if !git_available() {
        return;
    }
    let repo = init_repo();
    git(repo.path(), &["tag", "v1.1.1aaa"]);

    cmd()
        .args(["-C", path_arg(&repo), "tag", "patch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not match version: v1.1.1aaa"));

    assert_eq!(git(repo.path(), &["tag", "--list"]).trim(), "v1.1.1aaa");
}

#[test]
fn tag_without_any_tags_reports_git_text() {
    if !git_available() {
        return;
    }
    let repo = init_repo();

    cmd()
        .args(["-C", path_arg(&repo), "tag", "minor"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no tag found"))
        .stderr(predicate::str::contains("fatal:"));
}

#[test]
fn tag_push_failure_is_nonzero() {
    if !git_available() {
        return;
    }
    let repo = init_repo();
    git(repo.path(), &["tag", "v0.1.0"]);

    cmd()
        .args(["-C", path_arg(&repo), "tag", "patch", "--push"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("origin"));

    assert!(git(repo.path(), &["tag", "--list"]).contains("v0.1.1"));
}

// =============================================================================
// Delete Merged Branch
// =============================================================================

#[test]
fn delete_merged_branch_removes_feature() {
    if !git_available() {
        return;
    }
    let repo = init_repo();
    git(repo.path(), &["branch", "feature"]);
    git(repo.path(), &["branch", "production"]);

    cmd()
        .args(["-C", path_arg(&repo), "--color", "never", "delete-merged-branch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted feature"));

    let branches = git(repo.path(), &["branch", "--format=%(refname:short)"]);
    assert_eq!(branches.lines().collect::<Vec<_>>(), ["main", "production"]);
}

#[test]
fn mergedd_alias_with_json() {
    if !git_available() {
        return;
    }
    let repo = init_repo();
    git(repo.path(), &["branch", "done"]);

    let output = cmd()
        .args(["-C", path_arg(&repo), "--json", "mergedd"])
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_slice(&output.get_output().stdout).expect("valid JSON");
    assert_eq!(json["deleted"], serde_json::json!(["done"]));
}

#[test]
fn delete_outside_repository_fails() {
    if !git_available() {
        return;
    }
    let tmp = TempDir::new().unwrap();

    cmd()
        .args(["-C", path_arg(&tmp), "mergedd"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to list merged branches: fatal:"));
}

// =============================================================================
// Doctor
// =============================================================================

#[test]
fn doctor_json_reports_git() {
    let tmp = TempDir::new().unwrap();
    let output = cmd()
        .args(["-C", path_arg(&tmp), "doctor", "--json"])
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_slice(&output.get_output().stdout).expect("valid JSON");
    assert_eq!(json["git"]["program"], "git");
    assert_eq!(json["config"]["found"], false);
}
