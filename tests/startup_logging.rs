//! Binary startup tests
//!
//! Runs the toolhub binary against an isolated home directory and checks what
//! lands in its log file.

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

fn run_toolhub(home: &Path, cwd: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_toolhub"))
        .args(args)
        .current_dir(cwd)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("XDG_RUNTIME_DIR", home.join("run"))
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn read_log(home: &Path) -> String {
    fs::read_to_string(home.join("data").join("toolhub").join("logs").join("toolhub.log")).unwrap()
}

/// Integration test: a broken fallback config is reported in the log file
#[test]
fn test_broken_config_is_logged() {
    let home = TempDir::new().unwrap();
    let cwd = TempDir::new().unwrap();
    fs::write(cwd.path().join("toolhub.yml"), "catalog: [unclosed").unwrap();

    // No daemon is running, so the command itself fails
    let output = run_toolhub(home.path(), cwd.path(), &["stats"]);
    assert!(!output.status.success());

    let log = read_log(home.path());
    assert!(log.contains("Failed to load config from toolhub.yml"), "log was:\n{}", log);
    assert!(log.contains("No config file found, using defaults"));
}

/// Integration test: the configured level applies after startup
#[test]
fn test_configured_level_applies() {
    let home = TempDir::new().unwrap();
    let cwd = TempDir::new().unwrap();
    fs::write(cwd.path().join("toolhub.yml"), "log_level: warn\n").unwrap();

    run_toolhub(home.path(), cwd.path(), &["stats"]);

    let log = read_log(home.path());
    assert!(log.contains("Loaded config from: toolhub.yml"));
    assert!(!log.contains("Starting application"), "log was:\n{}", log);
}
