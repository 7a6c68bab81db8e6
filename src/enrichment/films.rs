//! Film metadata backfill.

use std::sync::Arc;
use std::time::Duration;

use reelqueue_common::Result;
use tracing::{debug, info, warn};

use super::{merge_film, pace, EnrichmentReport, RATE_LIMIT};
use crate::metadata::MetadataProvider;
use crate::repository::FilmRepository;
use crate::services::resolve::fetch_film;

/// Fills in runtime, genres and poster for films stored without them.
pub struct FilmEnrichmentService {
    provider: Arc<dyn MetadataProvider>,
    films: Arc<dyn FilmRepository>,
    delay: Duration,
}

impl FilmEnrichmentService {
    pub fn new(provider: Arc<dyn MetadataProvider>, films: Arc<dyn FilmRepository>) -> Self {
        Self {
            provider,
            films,
            delay: RATE_LIMIT,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Run one pass over every film with missing data, in id order.
    ///
    /// Only loading the candidates can fail; per-film errors are counted in
    /// the report. Films the provider has nothing new for are left untouched
    /// and counted neither as enriched nor as failed.
    pub async fn enrich_missing_data(&self) -> Result<EnrichmentReport> {
        let total = self.films.count().await?;
        let candidates = self.films.find_missing_data().await?;
        debug_assert!(candidates.iter().all(|f| f.needs_enrichment()));

        if candidates.is_empty() {
            info!(total = total, "No films need enrichment");
            return Ok(EnrichmentReport::nothing_to_do(total, "films"));
        }

        info!(
            total = total,
            candidates = candidates.len(),
            "Starting film enrichment"
        );

        let mut enriched = 0;
        let mut failed = 0;
        let mut unchanged = 0;
        for (index, film) in candidates.iter().enumerate() {
            pace(index, self.delay).await;

            let fetched = match fetch_film(self.provider.as_ref(), film.id, film.is_tv).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    warn!(film_id = film.id, error = %e, "Film enrichment failed; continuing with next film");
                    failed += 1;
                    continue;
                }
            };

            let merged = merge_film(film, fetched);
            if merged == *film {
                debug!(film_id = film.id, "Provider has no new data for film");
                unchanged += 1;
                continue;
            }
            match self.films.save(&merged).await {
                Ok(()) => {
                    info!(film_id = film.id, title = %merged.title, "Enriched film");
                    enriched += 1;
                }
                Err(e) => {
                    warn!(film_id = film.id, error = %e, "Failed to store enriched film");
                    failed += 1;
                }
            }
        }

        let summary = format!(
            "Enriched {enriched} of {} films ({failed} failed, {unchanged} unchanged)",
            candidates.len()
        );
        info!(
            enriched = enriched,
            failed = failed,
            unchanged = unchanged,
            "Film enrichment finished"
        );

        Ok(EnrichmentReport {
            total,
            candidate_count: candidates.len(),
            enriched_count: enriched,
            failed_count: failed,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use crate::metadata::stub::{movie, StubProvider};
    use crate::repository::SqliteRepository;
    use reelqueue_db::models::Film;
    use reelqueue_db::pool::init_memory_pool;

    fn setup(provider: StubProvider) -> (Arc<StubProvider>, Arc<SqliteRepository>) {
        (
            Arc::new(provider),
            Arc::new(SqliteRepository::new(init_memory_pool().unwrap())),
        )
    }

    fn complete(id: i64) -> Film {
        Film {
            id,
            title: format!("Film {id}"),
            original_title: None,
            release_date: None,
            runtime_minutes: Some(100),
            genres: vec!["Drama".into()],
            poster_path: Some("/p.jpg".into()),
            is_tv: false,
        }
    }

    #[tokio::test]
    async fn test_no_candidates_makes_no_calls() {
        let (provider, repo) = setup(StubProvider::new());
        repo.save(&complete(1)).await.unwrap();
        repo.save(&complete(2)).await.unwrap();

        let service = FilmEnrichmentService::new(provider.clone(), repo.clone());
        let report = service.enrich_missing_data().await.unwrap();

        assert_eq!(report.total, 2);
        assert_eq!(report.candidate_count, 0);
        assert_eq!(report.enriched_count, 0);
        assert!(!report.summary.is_empty());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_the_pass() {
        let provider = StubProvider::new()
            .with_movie(movie(1, "One", 91))
            .with_movie(movie(3, "Three", 93));
        let (provider, repo) = setup(provider);
        for id in [1, 2, 3] {
            repo.save(&Film::placeholder(id, false)).await.unwrap();
        }
        repo.save(&complete(4)).await.unwrap();

        let service =
            FilmEnrichmentService::new(provider.clone(), repo.clone()).with_delay(Duration::ZERO);
        let report = service.enrich_missing_data().await.unwrap();

        assert_eq!(report.total, 4);
        assert_eq!(report.candidate_count, 3);
        assert_eq!(report.enriched_count, 2);
        assert_eq!(report.failed_count, 1);
        assert_eq!(provider.calls(), 3);

        let one = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(one.title, "One");
        assert_eq!(one.runtime_minutes, Some(91));
        let two = repo.find_by_id(2).await.unwrap().unwrap();
        assert_eq!(two, Film::placeholder(2, false));
    }

    #[tokio::test]
    async fn test_film_without_new_data_is_not_counted() {
        let mut no_poster = movie(5, "Film 5", 100);
        no_poster.poster_path = None;
        let (provider, repo) = setup(StubProvider::new().with_movie(no_poster));
        let mut stored = complete(5);
        stored.poster_path = None;
        stored.release_date = Some("2000-01-01".into());
        repo.save(&stored).await.unwrap();

        let report = FilmEnrichmentService::new(provider.clone(), repo.clone())
            .with_delay(Duration::ZERO)
            .enrich_missing_data()
            .await
            .unwrap();

        assert_eq!(report.candidate_count, 1);
        assert_eq!(report.enriched_count, 0);
        assert_eq!(report.failed_count, 0);
        assert!(report.summary.contains("1 unchanged"));
        assert_eq!(provider.calls(), 1);
        assert_eq!(repo.find_by_id(5).await.unwrap().unwrap(), stored);
    }

    #[test]
    fn test_default_delay_is_rate_limit() {
        let (provider, repo) = setup(StubProvider::new());
        let service = FilmEnrichmentService::new(provider, repo);
        assert_eq!(service.delay, RATE_LIMIT);
    }

    #[tokio::test]
    async fn test_delay_between_records() {
        let provider = StubProvider::new()
            .with_movie(movie(1, "One", 91))
            .with_movie(movie(2, "Two", 92))
            .with_movie(movie(3, "Three", 93));
        let (provider, repo) = setup(provider);
        for id in [1, 2, 3] {
            repo.save(&Film::placeholder(id, false)).await.unwrap();
        }

        let service = FilmEnrichmentService::new(provider, repo.clone())
            .with_delay(Duration::from_millis(40));
        let started = Instant::now();
        let report = service.enrich_missing_data().await.unwrap();

        assert_eq!(report.enriched_count, 3);
        // Two gaps for three records.
        assert!(started.elapsed() >= Duration::from_millis(80));
        assert!(repo.find_missing_data().await.unwrap().is_empty());
    }
}
