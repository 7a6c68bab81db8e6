use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub tmdb: TmdbConfig,

    #[serde(default)]
    pub enrichment: EnrichmentConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// SQLite database file (tilde is expanded)
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    /// Attempts to open the database at startup before giving up
    #[serde(default = "default_connect_retries")]
    pub connect_retries: u32,

    /// Fixed delay between two startup attempts
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("reelqueue.db")
}
fn default_connect_retries() -> u32 {
    5
}
fn default_retry_backoff_ms() -> u64 {
    2000
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            connect_retries: default_connect_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    /// TMDB v3 API key; `TMDB_API_KEY` takes precedence
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_language")]
    pub language: String,

    /// Client-side request quota
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
}

fn default_language() -> String {
    "en-US".to_string()
}
fn default_requests_per_second() -> u32 {
    4
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            language: default_language(),
            requests_per_second: default_requests_per_second(),
        }
    }
}

impl TmdbConfig {
    /// The API key, if one is set and not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

/// Which enrichment passes run at startup.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct EnrichmentConfig {
    #[serde(default)]
    pub films: bool,

    #[serde(default)]
    pub persons: bool,
}

impl EnrichmentConfig {
    pub fn any(&self) -> bool {
        self.films || self.persons
    }
}
