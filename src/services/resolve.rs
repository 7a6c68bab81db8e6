//! Turning provider details into [`Film`] rows.
//!
//! Movies map one-to-one. TV shows are collapsed into a single film whose
//! runtime is the sum of every episode of every regular season.

use anyhow::Context;
use reelqueue_common::FilmId;
use reelqueue_db::models::Film;
use tracing::{debug, warn};

use crate::metadata::{MetadataProvider, MovieDetails, SeasonDetails, TvDetails};

/// Season number the provider uses for specials.
const SPECIALS_SEASON: u32 = 0;

/// Fetch and convert a movie or TV show. Fails when the top-level lookup fails.
pub async fn fetch_film(
    provider: &dyn MetadataProvider,
    id: FilmId,
    is_tv: bool,
) -> anyhow::Result<Film> {
    if is_tv {
        fetch_tv(provider, id).await
    } else {
        let details = provider
            .get_movie_details(id)
            .await
            .with_context(|| format!("movie details for {id}"))?;
        Ok(film_from_movie(details))
    }
}

/// Like [`fetch_film`], but logs failures instead of returning them.
///
/// `None` when the provider is unavailable or the lookup failed; the caller
/// decides between a stored row and [`Film::placeholder`].
pub async fn resolve_film(
    provider: &dyn MetadataProvider,
    id: FilmId,
    is_tv: bool,
) -> Option<Film> {
    if !provider.is_available() {
        debug!(film_id = id, provider = provider.name(), "Provider unavailable; skipping lookup");
        return None;
    }
    match fetch_film(provider, id, is_tv).await {
        Ok(film) => Some(film),
        Err(e) => {
            warn!(
                film_id = id,
                is_tv = is_tv,
                error = %e,
                "Could not fetch film details"
            );
            None
        }
    }
}

async fn fetch_tv(provider: &dyn MetadataProvider, id: FilmId) -> anyhow::Result<Film> {
    let show = provider
        .get_tv_details(id)
        .await
        .with_context(|| format!("TV details for {id}"))?;

    let mut seasons = Vec::with_capacity(show.seasons.len());
    for summary in show
        .seasons
        .iter()
        .filter(|s| s.season_number != SPECIALS_SEASON)
    {
        match provider
            .get_tv_season_details(id, summary.season_number)
            .await
        {
            Ok(season) => seasons.push(season),
            Err(e) => {
                warn!(
                    film_id = id,
                    season = summary.season_number,
                    error = %e,
                    "Skipping season with unavailable details"
                );
            }
        }
    }

    let runtime = aggregate_tv_runtime(&seasons);
    debug!(film_id = id, seasons = seasons.len(), runtime = ?runtime, "Aggregated TV runtime");
    Ok(film_from_tv(show, runtime))
}

/// Total runtime over all episodes. Episodes without a runtime count as zero;
/// `None` when no episode reported one.
pub fn aggregate_tv_runtime(seasons: &[SeasonDetails]) -> Option<u32> {
    let runtimes: Vec<u32> = seasons
        .iter()
        .flat_map(|s| s.episodes.iter())
        .filter_map(|e| e.runtime)
        .collect();

    if runtimes.is_empty() {
        None
    } else {
        Some(runtimes.iter().sum())
    }
}

fn film_from_movie(details: MovieDetails) -> Film {
    Film {
        id: details.id,
        title: details.title,
        original_title: details.original_title,
        release_date: details.release_date,
        runtime_minutes: details.runtime,
        genres: details.genres,
        poster_path: details.poster_path,
        is_tv: false,
    }
}

fn film_from_tv(details: TvDetails, runtime: Option<u32>) -> Film {
    Film {
        id: details.id,
        title: details.name,
        original_title: details.original_name,
        release_date: details.first_air_date,
        runtime_minutes: runtime,
        genres: details.genres,
        poster_path: details.poster_path,
        is_tv: true,
    }
}
