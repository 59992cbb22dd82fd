// crates/lapboard-cli/tests/cli_commands.rs
// ============================================================================
// Module: CLI Command Tests
// Description: Integration tests for the lapboard binary.
// Purpose: Ensure version, config, and serve failures behave as documented.
// Dependencies: lapboard-cli binary, tempfile
// ============================================================================
//! ## Overview
//! Runs the built `lapboard` binary and checks exit codes and output for the
//! config commands and fail-closed server startup.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn lapboard_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_lapboard"))
}

fn run(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(lapboard_bin())
        .args(args)
        .current_dir(dir.path())
        .env_remove("LAPBOARD_CONFIG")
        .env_remove("PORT")
        .output()
        .expect("run lapboard")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn cli_prints_version() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir, &["--version"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), format!("lapboard {}", env!("CARGO_PKG_VERSION")));
}

#[test]
fn cli_config_example_round_trips_through_validate() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir, &["config", "example"]);
    assert!(output.status.success());
    let example = stdout(&output);
    assert!(example.contains("[store]"));
    assert!(example.contains("max_records = 5000"));

    let path = dir.path().join("example.toml");
    fs::write(&path, example).unwrap();
    let output = run(&dir, &["config", "validate", "--config", path.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "config ok");
}

#[test]
fn cli_config_validate_accepts_missing_default_file() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir, &["config", "validate"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[test]
fn cli_config_validate_reads_env_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(&path, "[store]\nmax_records = 0\n").unwrap();
    let output = Command::new(lapboard_bin())
        .args(["config", "validate"])
        .current_dir(dir.path())
        .env("LAPBOARD_CONFIG", &path)
        .output()
        .expect("run lapboard");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("store.max_records"));
}

#[test]
fn cli_config_validate_rejects_missing_explicit_file() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir, &["config", "validate", "--config", "absent.toml"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("failed to load config"));
}

#[test]
fn cli_serve_rejects_invalid_config_before_binding() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lapboard.toml");
    fs::write(&path, "[server]\nbind = \"not-an-address\"\n").unwrap();
    let output = run(&dir, &["serve", "--config", path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("invalid bind address"));
}

#[test]
fn cli_serve_rejects_unusable_store_path() {
    let dir = TempDir::new().unwrap();
    let store_dir = dir.path().join("store-dir");
    fs::create_dir_all(&store_dir).unwrap();
    let path = dir.path().join("lapboard.toml");
    fs::write(
        &path,
        format!("[store]\npath = \"{}\"\n[audit]\nenabled = false\n", store_dir.display()),
    )
    .unwrap();
    let output = run(&dir, &["serve", "--config", path.to_str().unwrap(), "--port", "0"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("server init failed"));
}
