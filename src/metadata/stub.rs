//! In-memory [`MetadataProvider`] for service tests.
//!
//! Every lookup is served from maps filled in by the test; ids without an
//! entry fail with an error. Calls are counted so tests can assert that a
//! code path never reached the provider.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use reelqueue_common::{FilmId, PersonId};

use super::provider::*;

#[derive(Default)]
pub(crate) struct StubProvider {
    pub movies: HashMap<FilmId, MovieDetails>,
    pub shows: HashMap<FilmId, TvDetails>,
    pub seasons: HashMap<(FilmId, u32), SeasonDetails>,
    pub persons: HashMap<PersonId, PersonDetails>,
    pub credits: HashMap<PersonId, Vec<Credit>>,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_movie(mut self, movie: MovieDetails) -> Self {
        self.movies.insert(movie.id, movie);
        self
    }

    pub fn with_show(mut self, show: TvDetails) -> Self {
        self.shows.insert(show.id, show);
        self
    }

    pub fn with_season(mut self, show_id: FilmId, season: SeasonDetails) -> Self {
        self.seasons.insert((show_id, season.season_number), season);
        self
    }

    pub fn with_person(mut self, person: PersonDetails) -> Self {
        self.persons.insert(person.id, person);
        self
    }

    pub fn with_credits(mut self, person_id: PersonId, credits: Vec<Credit>) -> Self {
        self.credits.insert(person_id, credits);
        self
    }

    /// Total number of provider calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Movie details with every backfillable field present.
pub(crate) fn movie(id: FilmId, title: &str, runtime: u32) -> MovieDetails {
    MovieDetails {
        id,
        title: title.to_string(),
        original_title: None,
        release_date: Some("2000-01-01".to_string()),
        runtime: Some(runtime),
        genres: vec!["Drama".to_string()],
        poster_path: Some(format!("/{id}.jpg")),
    }
}

/// Episodes with the given runtimes, numbered from 1.
pub(crate) fn season(season_number: u32, runtimes: &[Option<u32>]) -> SeasonDetails {
    SeasonDetails {
        season_number,
        episodes: runtimes
            .iter()
            .enumerate()
            .map(|(i, runtime)| EpisodeSummary {
                episode_number: i as u32 + 1,
                runtime: *runtime,
            })
            .collect(),
    }
}

#[async_trait]
impl MetadataProvider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn search_person(&self, query: &str) -> anyhow::Result<Vec<PersonSearchResult>> {
        self.record();
        let needle = query.to_lowercase();
        Ok(self
            .persons
            .values()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .map(|p| PersonSearchResult {
                id: p.id,
                name: p.name.clone(),
                known_for_department: p.known_for_department.clone(),
                profile_path: p.profile_path.clone(),
                popularity: 1.0,
            })
            .collect())
    }

    async fn search_movie(&self, query: &str) -> anyhow::Result<Vec<FilmSearchResult>> {
        self.record();
        let needle = query.to_lowercase();
        Ok(self
            .movies
            .values()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .map(|m| FilmSearchResult {
                id: m.id,
                title: m.title.clone(),
                release_date: m.release_date.clone(),
                poster_path: m.poster_path.clone(),
                is_tv: false,
            })
            .collect())
    }

    async fn search_tv(&self, query: &str) -> anyhow::Result<Vec<FilmSearchResult>> {
        self.record();
        let needle = query.to_lowercase();
        Ok(self
            .shows
            .values()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .map(|s| FilmSearchResult {
                id: s.id,
                title: s.name.clone(),
                release_date: s.first_air_date.clone(),
                poster_path: s.poster_path.clone(),
                is_tv: true,
            })
            .collect())
    }

    async fn get_movie_details(&self, id: FilmId) -> anyhow::Result<MovieDetails> {
        self.record();
        self.movies
            .get(&id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("movie {id} not found"))
    }

    async fn get_tv_details(&self, id: FilmId) -> anyhow::Result<TvDetails> {
        self.record();
        self.shows
            .get(&id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("show {id} not found"))
    }

    async fn get_tv_season_details(
        &self,
        show_id: FilmId,
        season_number: u32,
    ) -> anyhow::Result<SeasonDetails> {
        self.record();
        self.seasons
            .get(&(show_id, season_number))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("season {season_number} of {show_id} not found"))
    }

    async fn get_person_details(&self, id: PersonId) -> anyhow::Result<PersonDetails> {
        self.record();
        self.persons
            .get(&id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("person {id} not found"))
    }

    async fn get_person_credits(&self, id: PersonId) -> anyhow::Result<Vec<Credit>> {
        self.record();
        self.credits
            .get(&id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("credits for {id} not found"))
    }
}
