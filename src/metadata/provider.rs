//! Trait definition and types for metadata providers.
//!
//! This module defines the [`MetadataProvider`] trait the services consume,
//! along with the subset of provider data reelqueue actually reads.

use async_trait::async_trait;
use reelqueue_common::{FilmId, PersonId};
use serde::{Deserialize, Serialize};

/// Base URL prepended to provider image paths.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Convert a provider image path fragment (e.g. `/abc.jpg`) to a full URL.
pub fn image_url(path: &str) -> String {
    format!("{IMAGE_BASE_URL}{path}")
}

// ---------------------------------------------------------------------------
// Search results
// ---------------------------------------------------------------------------

/// A person returned from a name search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonSearchResult {
    pub id: PersonId,
    pub name: String,
    /// Raw department label as reported by the provider (e.g. `"Acting"`).
    pub known_for_department: Option<String>,
    pub profile_path: Option<String>,
    pub popularity: f64,
}

/// A movie or TV show returned from a title search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilmSearchResult {
    pub id: FilmId,
    pub title: String,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub is_tv: bool,
}

// ---------------------------------------------------------------------------
// Details
// ---------------------------------------------------------------------------

/// Details of a single movie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub id: FilmId,
    pub title: String,
    pub original_title: Option<String>,
    pub release_date: Option<String>,
    /// Runtime in minutes, if known.
    pub runtime: Option<u32>,
    pub genres: Vec<String>,
    pub poster_path: Option<String>,
}

/// Details of a TV show. Episode runtimes live in the season details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TvDetails {
    pub id: FilmId,
    pub name: String,
    pub original_name: Option<String>,
    pub first_air_date: Option<String>,
    pub genres: Vec<String>,
    pub poster_path: Option<String>,
    pub seasons: Vec<SeasonSummary>,
}

/// A season as listed on the show.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeasonSummary {
    /// Season number; `0` is reserved for specials.
    pub season_number: u32,
    pub episode_count: u32,
}

/// Episode list of one season.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeasonDetails {
    pub season_number: u32,
    pub episodes: Vec<EpisodeSummary>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EpisodeSummary {
    pub episode_number: u32,
    /// Runtime in minutes, if known.
    pub runtime: Option<u32>,
}

/// Details of a person.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonDetails {
    pub id: PersonId,
    pub name: String,
    pub known_for_department: Option<String>,
    /// Profile image path fragment, not a full URL.
    pub profile_path: Option<String>,
}

/// One entry of a person's filmography.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Credit {
    pub id: FilmId,
    pub title: String,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub is_tv: bool,
    /// Character name for cast credits, job for crew credits.
    pub role: Option<String>,
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Async trait the services use to reach the metadata provider.
///
/// Every call either returns a structured result or fails; callers decide
/// whether a failure is fatal. Nothing is retried at this level beyond what
/// the concrete client does for rate-limit responses.
///
/// Providers are shared across tasks as `Arc<dyn MetadataProvider>`.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Short, lowercase identifier for this provider (e.g. `"tmdb"`).
    fn name(&self) -> &'static str;

    /// Returns `true` when the provider has credentials configured.
    fn is_available(&self) -> bool;

    async fn search_person(&self, query: &str) -> anyhow::Result<Vec<PersonSearchResult>>;

    async fn search_movie(&self, query: &str) -> anyhow::Result<Vec<FilmSearchResult>>;

    async fn search_tv(&self, query: &str) -> anyhow::Result<Vec<FilmSearchResult>>;

    async fn get_movie_details(&self, id: FilmId) -> anyhow::Result<MovieDetails>;

    async fn get_tv_details(&self, id: FilmId) -> anyhow::Result<TvDetails>;

    async fn get_tv_season_details(
        &self,
        show_id: FilmId,
        season_number: u32,
    ) -> anyhow::Result<SeasonDetails>;

    async fn get_person_details(&self, id: PersonId) -> anyhow::Result<PersonDetails>;

    /// Movie and TV credits of a person, cast and crew combined.
    async fn get_person_credits(&self, id: PersonId) -> anyhow::Result<Vec<Credit>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_url_construction() {
        assert_eq!(
            image_url("/abc123.jpg"),
            "https://image.tmdb.org/t/p/w500/abc123.jpg"
        );
    }
}
