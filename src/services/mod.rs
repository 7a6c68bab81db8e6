//! Queue and membership services.
//!
//! - [`queues`] -- Person selection, the queue list and filmographies.
//! - [`queue_films`] -- Adding, removing and ordering films inside a queue.
//! - [`resolve`] -- Converting provider details into film rows.

pub mod queue_films;
pub mod queues;
pub mod resolve;

pub use queue_films::QueueFilmService;
pub use queues::{FilmographyEntry, PersonSeed, QueueOverview, QueueService};
