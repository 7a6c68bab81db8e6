//! Configuration file loading.

use std::fs;
use std::path::PathBuf;

use reelqueue::config::{load_config, load_config_or_default};
use tempfile::tempdir;

#[test]
fn loads_full_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("reelqueue.toml");
    fs::write(
        &path,
        r#"
[database]
path = "/var/lib/reelqueue/queue.db"
connect_retries = 3
retry_backoff_ms = 500

[tmdb]
api_key = "file-key"
language = "fr-FR"
requests_per_second = 10

[enrichment]
films = true
persons = true
"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.database.path, PathBuf::from("/var/lib/reelqueue/queue.db"));
    assert_eq!(config.database.connect_retries, 3);
    assert_eq!(config.database.retry_backoff_ms, 500);
    assert_eq!(config.tmdb.language, "fr-FR");
    assert_eq!(config.tmdb.requests_per_second, 10);
    assert!(config.enrichment.films);
    assert!(config.enrichment.persons);
    assert!(config.tmdb.api_key().is_some());
}

#[test]
fn explicit_path_wins_over_search() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(&path, "[database]\nconnect_retries = 2\n").unwrap();

    let config = load_config_or_default(Some(&path)).unwrap();
    assert_eq!(config.database.connect_retries, 2);
}

#[test]
fn invalid_values_are_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[tmdb]\nrequests_per_second = 0\n").unwrap();

    let err = load_config(&path).unwrap_err();
    assert!(format!("{err:#}").contains("requests_per_second"));
}

#[test]
fn malformed_toml_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[database\npath = 1").unwrap();

    let err = load_config(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse config file"));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    assert!(load_config(&dir.path().join("absent.toml")).is_err());
}
