//! Internal Rust models matching the database schema.
//!
//! This module provides strongly-typed Rust structures that map to database tables.
//! All models use types from reelqueue-common where appropriate.

use chrono::{DateTime, Utc};
use reelqueue_common::{Department, FilmId, PersonId, QueueId, QueueKindTag};
use serde::{Deserialize, Serialize};

/// Separator used for the `films.genres` column.
pub const GENRE_SEPARATOR: &str = ",";

/// Title stored when a movie's details could not be fetched.
pub const UNKNOWN_FILM_TITLE: &str = "Unknown Film";

/// Title stored when a TV show's details could not be fetched.
pub const UNKNOWN_TV_TITLE: &str = "Unknown TV Show";

/// A movie, or a TV show aggregated into a single entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Film {
    pub id: FilmId,
    pub title: String,
    pub original_title: Option<String>,
    /// Release (or first air) date, `YYYY-MM-DD`.
    pub release_date: Option<String>,
    /// Runtime in minutes. For TV shows this is the sum over all episodes.
    pub runtime_minutes: Option<u32>,
    pub genres: Vec<String>,
    pub poster_path: Option<String>,
    pub is_tv: bool,
}

impl Film {
    /// Minimal record used when the provider could not describe `id`.
    pub fn placeholder(id: FilmId, is_tv: bool) -> Self {
        let title = if is_tv {
            UNKNOWN_TV_TITLE
        } else {
            UNKNOWN_FILM_TITLE
        };
        Self {
            id,
            title: title.to_string(),
            original_title: None,
            release_date: None,
            runtime_minutes: None,
            genres: Vec::new(),
            poster_path: None,
            is_tv,
        }
    }

    /// Whether any backfillable field (runtime, genres, poster) is missing.
    ///
    /// Same predicate as [`crate::queries::films::list_films_missing_data`].
    pub fn needs_enrichment(&self) -> bool {
        self.runtime_minutes.is_none()
            || self.genres.is_empty()
            || self.poster_path.as_deref().map_or(true, str::is_empty)
    }
}

/// A person whose filmography backs a queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub department: Department,
    /// Full URL of the profile image.
    pub image_path: Option<String>,
}

impl Person {
    /// Same predicate as [`crate::queries::persons::list_persons_missing_image`].
    pub fn needs_enrichment(&self) -> bool {
        self.image_path.as_deref().map_or(true, str::is_empty)
    }
}

/// What a queue is built from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QueueKind {
    /// Films from one person's filmography.
    PersonQueue { person_id: PersonId },
}

impl QueueKind {
    pub fn tag(&self) -> QueueKindTag {
        match self {
            Self::PersonQueue { .. } => QueueKindTag::PersonQueue,
        }
    }

    pub fn person_id(&self) -> Option<PersonId> {
        match self {
            Self::PersonQueue { person_id } => Some(*person_id),
        }
    }
}

/// A user-ordered queue of films.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Queue {
    pub id: QueueId,
    pub kind: QueueKind,
    pub created_at: DateTime<Utc>,
    pub sort_order: i64,
}

/// Membership of a film in a queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueueFilm {
    pub queue_id: QueueId,
    pub film_id: FilmId,
    pub added_at: DateTime<Utc>,
    pub sort_order: i64,
}

/// A queue member joined with its film row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueueFilmEntry {
    pub film: Film,
    pub added_at: DateTime<Utc>,
    pub sort_order: i64,
}

/// Serialize genres for the `films.genres` column. Empty lists become `NULL`.
pub fn genres_to_column(genres: &[String]) -> Option<String> {
    let cleaned: Vec<&str> = genres
        .iter()
        .map(|g| g.trim())
        .filter(|g| !g.is_empty())
        .collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.join(GENRE_SEPARATOR))
    }
}

/// Parse the `films.genres` column.
pub fn genres_from_column(column: Option<String>) -> Vec<String> {
    column
        .map(|s| {
            s.split(GENRE_SEPARATOR)
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
