//! CLI end-to-end tests
//!
//! Tests for the reelqueue command-line interface. No TMDB key is configured,
//! so every film and person comes from local fallbacks and no request leaves
//! the machine.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

/// Get a command for the reelqueue binary
#[allow(deprecated)]
fn reelqueue_cmd() -> Command {
    let mut cmd = Command::cargo_bin("reelqueue").unwrap();
    cmd.env_remove("TMDB_API_KEY")
        .env_remove("REELQUEUE_ENRICH_FILMS")
        .env_remove("REELQUEUE_ENRICH_PERSONS")
        .env_remove("RUST_LOG");
    cmd
}

/// Write a config that points the database into `dir`.
fn write_config(dir: &TempDir) -> PathBuf {
    let config_path = dir.path().join("reelqueue.toml");
    let db_path = dir.path().join("data").join("reelqueue.db");
    fs::write(
        &config_path,
        format!(
            "[database]\npath = {:?}\nconnect_retries = 1\nretry_backoff_ms = 0\n",
            db_path.to_string_lossy()
        ),
    )
    .unwrap();
    config_path
}

fn run(config: &Path, args: &[&str]) -> String {
    let output = reelqueue_cmd()
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "{:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn test_cli_no_args_shows_help() {
    reelqueue_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    reelqueue_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("reelqueue"));
}

#[test]
fn test_cli_validate_config() {
    let dir = tempdir().unwrap();
    let config = write_config(&dir);

    reelqueue_cmd()
        .arg("validate")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("TMDB API key: not set"));
}

#[test]
fn test_cli_validate_rejects_enrichment_without_key() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "[enrichment]\nfilms = true\n").unwrap();

    reelqueue_cmd()
        .arg("validate")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("TMDB_API_KEY"));
}

#[test]
fn test_cli_search_requires_key() {
    let dir = tempdir().unwrap();
    let config = write_config(&dir);

    reelqueue_cmd()
        .arg("--config")
        .arg(&config)
        .args(["search-person", "varda"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TMDB API key"));
}

#[test]
fn test_cli_queue_workflow() {
    let dir = tempdir().unwrap();
    let config = write_config(&dir);

    let first = run(
        &config,
        &["select-person", "1", "--name", "Agnès Varda", "--department", "directing"],
    );
    let first = first.trim().to_string();
    let second = run(&config, &["select-person", "2", "--name", "Chantal Akerman"]);
    let second = second.trim().to_string();

    // Selecting again returns the same queue.
    assert_eq!(run(&config, &["select-person", "1"]).trim(), first);

    let added = run(&config, &["add-film", &first, "10"]);
    assert!(added.contains("position 0"));
    run(&config, &["add-film", &first, "11"]);
    run(&config, &["add-film", &first, "12", "--tv"]);

    let listing = run(&config, &["reorder-films", &first, "12", "10"]);
    let ids: Vec<&str> = listing
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .collect();
    assert_eq!(ids, vec!["12", "10", "11"]);
    assert!(listing.contains("Unknown TV Show"));
    assert!(listing.contains("Unknown Film"));

    reelqueue_cmd()
        .arg("--config")
        .arg(&config)
        .args(["add-film", &first, "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Already exists"));

    run(&config, &["reorder-queues", &second]);
    let queues: serde_json::Value =
        serde_json::from_str(&run(&config, &["queues", "--json"])).unwrap();
    assert_eq!(queues[0]["queue"]["id"], second.as_str());
    assert_eq!(queues[1]["queue"]["id"], first.as_str());
    assert_eq!(queues[1]["film_count"], 3);
    assert_eq!(queues[1]["person"]["department"], "DIRECTING");

    run(&config, &["remove-film", &first, "12"]);
    let films: serde_json::Value =
        serde_json::from_str(&run(&config, &["queue-films", &first, "--json"])).unwrap();
    assert_eq!(films.as_array().unwrap().len(), 2);
    assert_eq!(films[0]["film"]["id"], 10);
    assert_eq!(films[0]["sort_order"], 0);
    assert_eq!(films[1]["sort_order"], 1);

    run(&config, &["delete-person", "2"]);
    let queues: serde_json::Value =
        serde_json::from_str(&run(&config, &["queues", "--json"])).unwrap();
    assert_eq!(queues.as_array().unwrap().len(), 1);
    assert_eq!(queues[0]["queue"]["sort_order"], 0);

    run(&config, &["delete-queue", &first]);
    assert_eq!(run(&config, &["queues"]).trim(), "");
}

#[test]
fn test_cli_start_without_enrichment() {
    let dir = tempdir().unwrap();
    let config = write_config(&dir);

    reelqueue_cmd()
        .arg("--config")
        .arg(&config)
        .arg("start")
        .assert()
        .success()
        .stdout(predicate::str::contains("no enrichment enabled"));
    assert!(dir.path().join("data").join("reelqueue.db").exists());
}
