//! CLI integration tests
//!
//! End-to-end tests for CLI commands using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the atlas binary for testing
fn atlas_cmd() -> Command {
    Command::cargo_bin("atlas").unwrap()
}

#[test]
fn test_version_output() {
    atlas_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("atlas"));
}

#[test]
fn test_help_shows_all_commands() {
    atlas_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("attractions"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_serve_help() {
    atlas_cmd()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--host"));
}

#[test]
fn test_config_init_creates_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("atlas.toml");

    atlas_cmd()
        .args(["config", "init", "-o"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file created"));

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("maps_api_key_env"));
}

#[test]
fn test_config_init_refuses_overwrite_without_force() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("atlas.toml");
    std::fs::write(&config_path, "# mine").unwrap();

    atlas_cmd()
        .args(["config", "init", "-o"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    atlas_cmd()
        .args(["config", "init", "--force", "-o"])
        .arg(&config_path)
        .assert()
        .success();
    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[server]"));
}

#[test]
fn test_completions_bash() {
    atlas_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("atlas"));
}

#[test]
fn test_serve_refuses_to_start_without_maps_key() {
    let temp_dir = TempDir::new().unwrap();

    atlas_cmd()
        .current_dir(temp_dir.path())
        .env_remove("MAPS_API_KEY")
        .env_remove("RUST_LOG")
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("MAPS_API_KEY"));
}

#[test]
fn test_attractions_requires_maps_key() {
    let temp_dir = TempDir::new().unwrap();

    atlas_cmd()
        .current_dir(temp_dir.path())
        .env_remove("MAPS_API_KEY")
        .args(["attractions", "Lima"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("MAPS_API_KEY"));
}

#[test]
fn test_attractions_rejects_unknown_sort() {
    atlas_cmd()
        .args(["attractions", "Lima", "--sort-by", "stars"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid sort key"));
}
