//! Startup wiring: database connection, provider client and services.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reelqueue_db::pool::{init_pool, DbPool};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::{Config, DatabaseConfig, TmdbConfig};
use crate::enrichment::{
    spawn_enrichment, EnrichmentRun, FilmEnrichmentService, PersonEnrichmentService,
};
use crate::metadata::{MetadataProvider, TmdbProvider};
use crate::repository::SqliteRepository;
use crate::services::{QueueFilmService, QueueService};

/// Open the database, retrying `connect_retries` times with a fixed
/// `retry_backoff_ms` pause between attempts.
pub async fn connect_with_retry(config: &DatabaseConfig) -> Result<DbPool> {
    let path = config.path.to_string_lossy().into_owned();
    if let Some(parent) = Path::new(&path).parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory {:?}", parent))?;
        }
    }

    let attempts = config.connect_retries.max(1);
    let backoff = Duration::from_millis(config.retry_backoff_ms);
    let mut attempt = 1;
    loop {
        match init_pool(&path) {
            Ok(pool) => {
                info!(path = %path, attempt = attempt, "Connected to database");
                return Ok(pool);
            }
            Err(e) if attempt < attempts => {
                warn!(
                    path = %path,
                    attempt = attempt,
                    max_attempts = attempts,
                    error = %e,
                    "Database connection failed; retrying"
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Could not connect to database {path} after {attempts} attempts")
                });
            }
        }
    }
}

/// Build the TMDB client. Without an API key the client is still created
/// but reports itself unavailable and every lookup fails.
pub fn build_provider(config: &TmdbConfig) -> Result<Arc<dyn MetadataProvider>> {
    let provider = TmdbProvider::new(
        config.api_key().unwrap_or_default().to_string(),
        config.language.clone(),
    )?
    .with_requests_per_second(config.requests_per_second);
    Ok(Arc::new(provider))
}

/// Every service, wired to one repository and one provider.
pub struct AppServices {
    pub repository: Arc<SqliteRepository>,
    pub provider: Arc<dyn MetadataProvider>,
    pub queues: QueueService,
    pub queue_films: QueueFilmService,
}

impl AppServices {
    pub fn new(pool: DbPool, provider: Arc<dyn MetadataProvider>) -> Self {
        let repository = Arc::new(SqliteRepository::new(pool));
        let queues = QueueService::new(
            provider.clone(),
            repository.clone(),
            repository.clone(),
            repository.clone(),
        );
        let queue_films =
            QueueFilmService::new(provider.clone(), repository.clone(), repository.clone());
        Self {
            repository,
            provider,
            queues,
            queue_films,
        }
    }

    /// Connect to the configured database and provider.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let pool = connect_with_retry(&config.database).await?;
        let provider = build_provider(&config.tmdb)?;
        Ok(Self::new(pool, provider))
    }

    pub fn film_enrichment(&self) -> FilmEnrichmentService {
        FilmEnrichmentService::new(self.provider.clone(), self.repository.clone())
    }

    pub fn person_enrichment(&self) -> PersonEnrichmentService {
        PersonEnrichmentService::new(self.provider.clone(), self.repository.clone())
    }

    /// Spawn the passes enabled by `films` / `persons`.
    pub fn spawn_enrichment(&self, films: bool, persons: bool) -> Option<JoinHandle<EnrichmentRun>> {
        spawn_enrichment(
            films.then(|| self.film_enrichment()),
            persons.then(|| self.person_enrichment()),
        )
    }
}
