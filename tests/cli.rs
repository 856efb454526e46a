//! CLI tests for cmbuild.
//!
//! Each test runs the binary inside its own temporary directory, so build
//! directories never land in the crate checkout. Nothing here needs cmake or
//! make to be installed.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command for the cmbuild binary running in `dir` with no config overrides.
fn cmbuild(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("cmbuild");
    cmd.current_dir(dir.path())
        .env_remove("CMBUILD_CONFIG")
        .env_remove("CMBUILD_TOOLCHAIN")
        .env_remove("CMBUILD_JOBS")
        .env_remove("RUST_LOG");
    cmd
}

fn build_dirs_absent(dir: &TempDir) -> bool {
    !dir.path().join("release_build").exists() && !dir.path().join("debug_build").exists()
}

// =============================================================================
// Dispatch
// =============================================================================

#[test]
fn help_lists_commands() {
    let temp = TempDir::new().unwrap();
    cmbuild(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("clean_all"))
        .stdout(predicate::str::contains("configure"));
}

#[test]
fn unknown_command_prints_usage_and_fails() {
    let temp = TempDir::new().unwrap();
    cmbuild(&temp)
        .arg("frobnicate")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Unrecognized command"))
        .stdout(predicate::str::contains("clean_all"));
    assert!(build_dirs_absent(&temp));
}

#[test]
fn command_names_are_case_sensitive() {
    let temp = TempDir::new().unwrap();
    cmbuild(&temp)
        .arg("ALL")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Unrecognized command"));
}

#[test]
fn missing_command_fails() {
    let temp = TempDir::new().unwrap();
    cmbuild(&temp).assert().code(1);
}

// =============================================================================
// Arguments
// =============================================================================

#[test]
fn invalid_mode_is_argument_error() {
    let temp = TempDir::new().unwrap();
    cmbuild(&temp)
        .args(["all", "--mode=bogus"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("bogus"));
    assert!(build_dirs_absent(&temp));
}

#[test]
fn subcommand_help_succeeds() {
    let temp = TempDir::new().unwrap();
    cmbuild(&temp)
        .args(["configure", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--mode"));
}

// =============================================================================
// clean_all
// =============================================================================

#[test]
fn clean_all_removes_both_build_dirs() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("release_build/CMakeFiles")).unwrap();
    std::fs::create_dir_all(temp.path().join("debug_build")).unwrap();
    std::fs::write(temp.path().join("debug_build/CMakeCache.txt"), "").unwrap();

    cmbuild(&temp).arg("clean_all").assert().success();
    assert!(build_dirs_absent(&temp));
}

#[test]
fn clean_all_without_build_dirs_succeeds() {
    let temp = TempDir::new().unwrap();
    cmbuild(&temp)
        .arg("clean_all")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to clean"));
}

#[test]
fn clean_all_leaves_other_files() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir(temp.path().join("release_build")).unwrap();
    std::fs::write(temp.path().join("CMakeLists.txt"), "project(x)").unwrap();

    cmbuild(&temp).arg("clean_all").assert().success();
    assert!(temp.path().join("CMakeLists.txt").is_file());
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn invalid_config_file_is_configuration_error() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("cmbuild.toml"), "[build]\njobs = 0\n").unwrap();

    cmbuild(&temp)
        .arg("info")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("jobs"));
}

#[test]
fn clean_all_ignores_config_and_toolchain() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("cmbuild.toml"), "[build]\njobs = 0\n").unwrap();
    std::fs::create_dir(temp.path().join("debug_build")).unwrap();

    cmbuild(&temp)
        .env("CMBUILD_TOOLCHAIN", "vs1998Missing")
        .arg("clean_all")
        .assert()
        .success();
    assert!(build_dirs_absent(&temp));
}

#[test]
fn build_without_configure_reports_missing_build_dir() {
    let temp = TempDir::new().unwrap();
    cmbuild(&temp)
        .arg("build")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("configure"))
        .stderr(predicate::str::contains("Install").not());
}

#[test]
fn missing_explicit_config_is_configuration_error() {
    let temp = TempDir::new().unwrap();
    cmbuild(&temp)
        .env("CMBUILD_CONFIG", temp.path().join("nope.toml"))
        .arg("info")
        .assert()
        .code(1);
}

#[cfg(unix)]
#[test]
fn info_reports_unix_generator() {
    let temp = TempDir::new().unwrap();
    cmbuild(&temp)
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unix Makefiles"))
        .stdout(predicate::str::contains("release_build"));
}

#[cfg(unix)]
#[test]
fn info_honors_configured_jobs() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("cmbuild.toml"), "[build]\njobs = 3\n").unwrap();

    cmbuild(&temp)
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("3"));
}
