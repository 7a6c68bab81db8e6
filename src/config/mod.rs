mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable overriding `[tmdb].api_key`.
pub const ENV_TMDB_API_KEY: &str = "TMDB_API_KEY";
/// Environment variable overriding `[enrichment].films`.
pub const ENV_ENRICH_FILMS: &str = "REELQUEUE_ENRICH_FILMS";
/// Environment variable overriding `[enrichment].persons`.
pub const ENV_ENRICH_PERSONS: &str = "REELQUEUE_ENRICH_PERSONS";

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    finish(&mut config)?;
    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./reelqueue.toml",
        "./config.toml",
        "~/.config/reelqueue/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    let mut config = Config::default();
    finish(&mut config)?;
    Ok(config)
}

fn finish(config: &mut Config) -> Result<()> {
    apply_env_overrides(config, |key| std::env::var(key).ok());
    config.database.path = expand_path(&config.database.path);
    validate_config(config)
}

/// Apply environment overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(ENV_TMDB_API_KEY).filter(|k| !k.trim().is_empty()) {
        config.tmdb.api_key = Some(key);
    }
    if let Some(flag) = lookup(ENV_ENRICH_FILMS) {
        config.enrichment.films = parse_flag(&flag);
    }
    if let Some(flag) = lookup(ENV_ENRICH_PERSONS) {
        config.enrichment.persons = parse_flag(&flag);
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.database.connect_retries == 0 {
        anyhow::bail!("database.connect_retries must be at least 1");
    }

    if config.database.path.as_os_str().is_empty() {
        anyhow::bail!("database.path cannot be empty");
    }

    if config.tmdb.requests_per_second == 0 {
        anyhow::bail!("tmdb.requests_per_second must be at least 1");
    }

    if config.enrichment.any() && config.tmdb.api_key().is_none() {
        anyhow::bail!(
            "Enrichment is enabled but no TMDB API key is configured (set tmdb.api_key or {})",
            ENV_TMDB_API_KEY
        );
    }

    Ok(())
}
