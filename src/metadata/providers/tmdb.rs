//! TMDB (The Movie Database) metadata provider.
//!
//! Implements [`MetadataProvider`] by querying the TMDB v3 REST API.
//!
//! Features:
//! - Token-bucket rate limiting (default 4 requests / second) via [`governor`].
//! - Automatic retry on HTTP 429 with `Retry-After` header support (max 3 retries).
//! - 30-second request timeout.

use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reelqueue_common::{FilmId, PersonId};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::metadata::provider::{
    Credit, EpisodeSummary, FilmSearchResult, MetadataProvider, MovieDetails, PersonDetails,
    PersonSearchResult, SeasonDetails, SeasonSummary, TvDetails,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RETRIES: u32 = 3;
const DEFAULT_REQUESTS_PER_SECOND: u32 = 4;

// ---------------------------------------------------------------------------
// TMDB API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse<T> {
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TmdbPersonSearchResult {
    id: i64,
    name: Option<String>,
    known_for_department: Option<String>,
    profile_path: Option<String>,
    #[serde(default)]
    popularity: f64,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieSearchResult {
    id: i64,
    title: Option<String>,
    release_date: Option<String>,
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbTvSearchResult {
    id: i64,
    name: Option<String>,
    first_air_date: Option<String>,
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieDetail {
    id: i64,
    title: Option<String>,
    original_title: Option<String>,
    release_date: Option<String>,
    runtime: Option<u32>,
    genres: Option<Vec<TmdbGenre>>,
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbTvDetail {
    id: i64,
    name: Option<String>,
    original_name: Option<String>,
    first_air_date: Option<String>,
    genres: Option<Vec<TmdbGenre>>,
    poster_path: Option<String>,
    seasons: Option<Vec<TmdbSeasonSummary>>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TmdbSeasonSummary {
    season_number: u32,
    #[serde(default)]
    episode_count: u32,
}

#[derive(Debug, Deserialize)]
struct TmdbSeasonDetail {
    season_number: u32,
    episodes: Option<Vec<TmdbEpisode>>,
}

#[derive(Debug, Deserialize)]
struct TmdbEpisode {
    episode_number: u32,
    runtime: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TmdbPersonDetail {
    id: i64,
    name: Option<String>,
    known_for_department: Option<String>,
    profile_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbCombinedCredits {
    #[serde(default)]
    cast: Vec<TmdbCredit>,
    #[serde(default)]
    crew: Vec<TmdbCredit>,
}

#[derive(Debug, Deserialize)]
struct TmdbCredit {
    id: i64,
    media_type: Option<String>,
    title: Option<String>,
    name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    poster_path: Option<String>,
    character: Option<String>,
    job: Option<String>,
}

// ---------------------------------------------------------------------------
// Provider implementation
// ---------------------------------------------------------------------------

type DirectRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// TMDB metadata provider.
///
/// Wraps the TMDB v3 REST API with built-in rate limiting and retry logic
/// for `429 Too Many Requests`.
///
/// # Examples
///
/// ```no_run
/// use reelqueue::metadata::providers::TmdbProvider;
///
/// let provider = TmdbProvider::new("your-api-key".into(), "en-US".into()).unwrap();
/// ```
pub struct TmdbProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    language: String,
    rate_limiter: DirectRateLimiter,
}

fn limiter(requests_per_second: u32) -> DirectRateLimiter {
    let per_second = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
    RateLimiter::direct(Quota::per_second(per_second))
}

impl TmdbProvider {
    /// Create a new TMDB provider with the given API key and language.
    ///
    /// The `language` parameter is a language tag such as `"en-US"`.
    pub fn new(api_key: String, language: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: TMDB_BASE_URL.to_string(),
            api_key,
            language,
            rate_limiter: limiter(DEFAULT_REQUESTS_PER_SECOND),
        })
    }

    /// Point the provider at a different API root (used against mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the request quota. Zero is treated as one request per second.
    pub fn with_requests_per_second(mut self, requests_per_second: u32) -> Self {
        self.rate_limiter = limiter(requests_per_second);
        self
    }

    /// Execute a GET request with rate limiting and 429-retry logic, and
    /// decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        extra_params: &[(&str, &str)],
    ) -> anyhow::Result<T> {
        let url = format!("{}{path}", self.base_url);
        let mut params: Vec<(&str, &str)> =
            vec![("api_key", self.api_key.as_str()), ("language", self.language.as_str())];
        params.extend_from_slice(extra_params);

        let mut retries = 0u32;
        loop {
            self.rate_limiter.until_ready().await;

            debug!(path = path, "TMDB request");
            let resp = self
                .client
                .get(&url)
                .query(&params)
                .send()
                .await
                .with_context(|| format!("TMDB request failed: {path}"))?;

            if resp.status() == StatusCode::TOO_MANY_REQUESTS && retries < MAX_RETRIES {
                retries += 1;
                let wait = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                warn!(
                    retry = retries,
                    wait_secs = wait,
                    "TMDB returned 429, backing off"
                );
                tokio::time::sleep(Duration::from_secs(wait)).await;
                continue;
            }

            let resp = resp
                .error_for_status()
                .with_context(|| format!("TMDB request returned error: {path}"))?;

            return resp
                .json::<T>()
                .await
                .with_context(|| format!("failed to parse TMDB response: {path}"));
        }
    }
}

/// TMDB reports unknown dates and paths as empty strings.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn genre_names(genres: Option<Vec<TmdbGenre>>) -> Vec<String> {
    genres
        .unwrap_or_default()
        .into_iter()
        .map(|g| g.name)
        .collect()
}

fn to_credit(c: TmdbCredit, from_cast: bool) -> Option<Credit> {
    let is_tv = match c.media_type.as_deref() {
        Some("movie") => false,
        Some("tv") => true,
        _ => return None,
    };
    let (title, date) = if is_tv {
        (c.name, c.first_air_date)
    } else {
        (c.title, c.release_date)
    };
    Some(Credit {
        id: c.id,
        title: title.unwrap_or_default(),
        release_date: non_empty(date),
        poster_path: non_empty(c.poster_path),
        is_tv,
        role: non_empty(if from_cast { c.character } else { c.job }),
    })
}

#[async_trait]
impl MetadataProvider for TmdbProvider {
    fn name(&self) -> &'static str {
        "tmdb"
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn search_person(&self, query: &str) -> anyhow::Result<Vec<PersonSearchResult>> {
        let body: TmdbSearchResponse<TmdbPersonSearchResult> =
            self.get_json("/search/person", &[("query", query)]).await?;

        let mut results: Vec<PersonSearchResult> = body
            .results
            .into_iter()
            .map(|r| PersonSearchResult {
                id: r.id,
                name: r.name.unwrap_or_default(),
                known_for_department: non_empty(r.known_for_department),
                profile_path: non_empty(r.profile_path),
                popularity: r.popularity,
            })
            .collect();

        results.sort_by(|a, b| {
            b.popularity
                .partial_cmp(&a.popularity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(results)
    }

    async fn search_movie(&self, query: &str) -> anyhow::Result<Vec<FilmSearchResult>> {
        let body: TmdbSearchResponse<TmdbMovieSearchResult> =
            self.get_json("/search/movie", &[("query", query)]).await?;

        Ok(body
            .results
            .into_iter()
            .map(|r| FilmSearchResult {
                id: r.id,
                title: r.title.unwrap_or_default(),
                release_date: non_empty(r.release_date),
                poster_path: non_empty(r.poster_path),
                is_tv: false,
            })
            .collect())
    }

    async fn search_tv(&self, query: &str) -> anyhow::Result<Vec<FilmSearchResult>> {
        let body: TmdbSearchResponse<TmdbTvSearchResult> =
            self.get_json("/search/tv", &[("query", query)]).await?;

        Ok(body
            .results
            .into_iter()
            .map(|r| FilmSearchResult {
                id: r.id,
                title: r.name.unwrap_or_default(),
                release_date: non_empty(r.first_air_date),
                poster_path: non_empty(r.poster_path),
                is_tv: true,
            })
            .collect())
    }

    async fn get_movie_details(&self, id: FilmId) -> anyhow::Result<MovieDetails> {
        let detail: TmdbMovieDetail = self.get_json(&format!("/movie/{id}"), &[]).await?;

        Ok(MovieDetails {
            id: detail.id,
            title: detail.title.unwrap_or_default(),
            original_title: non_empty(detail.original_title),
            release_date: non_empty(detail.release_date),
            // TMDB uses 0 for "not known yet".
            runtime: detail.runtime.filter(|r| *r > 0),
            genres: genre_names(detail.genres),
            poster_path: non_empty(detail.poster_path),
        })
    }

    async fn get_tv_details(&self, id: FilmId) -> anyhow::Result<TvDetails> {
        let detail: TmdbTvDetail = self.get_json(&format!("/tv/{id}"), &[]).await?;

        Ok(TvDetails {
            id: detail.id,
            name: detail.name.unwrap_or_default(),
            original_name: non_empty(detail.original_name),
            first_air_date: non_empty(detail.first_air_date),
            genres: genre_names(detail.genres),
            poster_path: non_empty(detail.poster_path),
            seasons: detail
                .seasons
                .unwrap_or_default()
                .into_iter()
                .map(|s| SeasonSummary {
                    season_number: s.season_number,
                    episode_count: s.episode_count,
                })
                .collect(),
        })
    }

    async fn get_tv_season_details(
        &self,
        show_id: FilmId,
        season_number: u32,
    ) -> anyhow::Result<SeasonDetails> {
        let detail: TmdbSeasonDetail = self
            .get_json(&format!("/tv/{show_id}/season/{season_number}"), &[])
            .await?;

        Ok(SeasonDetails {
            season_number: detail.season_number,
            episodes: detail
                .episodes
                .unwrap_or_default()
                .into_iter()
                .map(|e| EpisodeSummary {
                    episode_number: e.episode_number,
                    runtime: e.runtime,
                })
                .collect(),
        })
    }

    async fn get_person_details(&self, id: PersonId) -> anyhow::Result<PersonDetails> {
        let detail: TmdbPersonDetail = self.get_json(&format!("/person/{id}"), &[]).await?;

        Ok(PersonDetails {
            id: detail.id,
            name: detail.name.unwrap_or_default(),
            known_for_department: non_empty(detail.known_for_department),
            profile_path: non_empty(detail.profile_path),
        })
    }

    async fn get_person_credits(&self, id: PersonId) -> anyhow::Result<Vec<Credit>> {
        let credits: TmdbCombinedCredits = self
            .get_json(&format!("/person/{id}/combined_credits"), &[])
            .await?;

        let cast = credits.cast.into_iter().filter_map(|c| to_credit(c, true));
        let crew = credits.crew.into_iter().filter_map(|c| to_credit(c, false));
        Ok(cast.chain(crew).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credit(media_type: &str) -> TmdbCredit {
        TmdbCredit {
            id: 1,
            media_type: Some(media_type.to_string()),
            title: Some("Movie Title".to_string()),
            name: Some("Show Name".to_string()),
            release_date: Some("2001-01-01".to_string()),
            first_air_date: Some("".to_string()),
            poster_path: None,
            character: Some("Herself".to_string()),
            job: Some("Director".to_string()),
        }
    }

    #[test]
    fn non_empty_filters_blank_strings() {
        assert_eq!(non_empty(Some("".to_string())), None);
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some("x".to_string())), Some("x".to_string()));
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn movie_credit_uses_title_and_release_date() {
        let c = to_credit(credit("movie"), true).unwrap();
        assert!(!c.is_tv);
        assert_eq!(c.title, "Movie Title");
        assert_eq!(c.release_date.as_deref(), Some("2001-01-01"));
        assert_eq!(c.role.as_deref(), Some("Herself"));
    }

    #[test]
    fn tv_crew_credit_uses_name_and_job() {
        let c = to_credit(credit("tv"), false).unwrap();
        assert!(c.is_tv);
        assert_eq!(c.title, "Show Name");
        assert_eq!(c.release_date, None);
        assert_eq!(c.role.as_deref(), Some("Director"));
    }

    #[test]
    fn unknown_media_type_is_skipped() {
        assert!(to_credit(credit("person"), true).is_none());
    }

    #[test]
    fn provider_is_available() {
        let provider = TmdbProvider::new("test-key".into(), "en-US".into()).unwrap();
        assert!(provider.is_available());

        let empty = TmdbProvider::new(String::new(), "en-US".into()).unwrap();
        assert!(!empty.is_available());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let provider = TmdbProvider::new("key".into(), "en-US".into())
            .unwrap()
            .with_base_url("http://localhost:1234/");
        assert_eq!(provider.base_url, "http://localhost:1234");
        assert_eq!(provider.name(), "tmdb");
    }
}
