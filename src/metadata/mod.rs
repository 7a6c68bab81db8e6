//! Metadata provider layer.
//!
//! # Module layout
//!
//! - [`provider`] -- Trait definition and the data types the services read.
//! - [`providers`] -- Concrete provider implementations (TMDB).

pub mod provider;
pub mod providers;

#[cfg(test)]
pub(crate) mod stub;

pub use provider::{
    image_url, Credit, EpisodeSummary, FilmSearchResult, MetadataProvider, MovieDetails,
    PersonDetails, PersonSearchResult, SeasonDetails, SeasonSummary, TvDetails,
};
pub use providers::TmdbProvider;
