//! Adding, removing and ordering the films of one queue.

use std::sync::Arc;

use reelqueue_common::{FilmId, QueueId, Result};
use reelqueue_db::models::{Film, QueueFilm, QueueFilmEntry};
use tracing::info;

use super::resolve::resolve_film;
use crate::metadata::MetadataProvider;
use crate::repository::{FilmRepository, QueueFilmRepository};

/// Queue membership operations.
///
/// Adding a film resolves its metadata through the provider first, so the
/// film row always exists before the association is written. A provider
/// failure never blocks the add: a stored row is kept as it is, otherwise the
/// film is stored as a placeholder and the enrichment pass fills it in later.
pub struct QueueFilmService {
    provider: Arc<dyn MetadataProvider>,
    films: Arc<dyn FilmRepository>,
    queue_films: Arc<dyn QueueFilmRepository>,
}

impl QueueFilmService {
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        films: Arc<dyn FilmRepository>,
        queue_films: Arc<dyn QueueFilmRepository>,
    ) -> Self {
        Self {
            provider,
            films,
            queue_films,
        }
    }

    /// Append a movie or TV show to the end of a queue.
    ///
    /// # Returns
    ///
    /// * `Ok(QueueFilm)` - The new association
    /// * `Err(Error::AlreadyExists)` - If the film is already in the queue
    /// * `Err(Error::NotFound)` - If the queue does not exist
    pub async fn add_film_to_queue(
        &self,
        queue_id: QueueId,
        film_id: FilmId,
        is_tv: bool,
    ) -> Result<QueueFilm> {
        let film = match resolve_film(self.provider.as_ref(), film_id, is_tv).await {
            Some(film) => {
                self.films.save(&film).await?;
                film
            }
            None => match self.films.find_by_id(film_id).await? {
                Some(stored) => stored,
                None => {
                    let film = Film::placeholder(film_id, is_tv);
                    self.films.save(&film).await?;
                    film
                }
            },
        };

        let association = self.queue_films.add(queue_id, film_id).await?;
        info!(
            queue_id = %queue_id,
            film_id = film_id,
            title = %film.title,
            position = association.sort_order,
            "Added film to queue"
        );
        Ok(association)
    }

    /// Remove a film; the films after it move up one position.
    pub async fn remove_film_from_queue(&self, queue_id: QueueId, film_id: FilmId) -> Result<bool> {
        let removed = self.queue_films.remove(queue_id, film_id).await?;
        if removed {
            info!(queue_id = %queue_id, film_id = film_id, "Removed film from queue");
        }
        Ok(removed)
    }

    pub async fn is_film_in_queue(&self, queue_id: QueueId, film_id: FilmId) -> Result<bool> {
        self.queue_films.exists(queue_id, film_id).await
    }

    /// The queue's films in position order.
    pub async fn get_queue_films(&self, queue_id: QueueId) -> Result<Vec<QueueFilmEntry>> {
        self.queue_films.find_by_queue(queue_id).await
    }

    /// Put `film_ids` first, in that order; other members keep their
    /// relative order after them.
    pub async fn reorder_queue_films(&self, queue_id: QueueId, film_ids: &[FilmId]) -> Result<()> {
        self.queue_films.reorder(queue_id, film_ids).await?;
        info!(queue_id = %queue_id, count = film_ids.len(), "Reordered queue films");
        Ok(())
    }
}
