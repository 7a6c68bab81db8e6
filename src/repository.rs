//! Store contracts consumed by the services.
//!
//! The services never touch SQL directly. They receive these traits as
//! `Arc<dyn ...>` handles, which lets tests swap in an in-memory pool and
//! keeps the query modules in `reelqueue-db` the single owner of the schema.
//!
//! [`SqliteRepository`] implements every contract on top of an r2d2 pool.

use async_trait::async_trait;
use reelqueue_common::{FilmId, PersonId, QueueId, Result};
use reelqueue_db::models::{Film, Person, Queue, QueueFilm, QueueFilmEntry, QueueKind};
use reelqueue_db::pool::{get_conn, DbPool};
use reelqueue_db::queries::{films, persons, queue_films, queues};

#[async_trait]
pub trait FilmRepository: Send + Sync {
    /// Insert or replace the film row keyed by its provider id.
    async fn save(&self, film: &Film) -> Result<()>;
    async fn find_by_id(&self, id: FilmId) -> Result<Option<Film>>;
    async fn find_all(&self) -> Result<Vec<Film>>;
    /// Films with an unset runtime, genre list or poster, ordered by id.
    async fn find_missing_data(&self) -> Result<Vec<Film>>;
    async fn count(&self) -> Result<usize>;
    async fn delete_by_id(&self, id: FilmId) -> Result<bool>;
}

#[async_trait]
pub trait PersonRepository: Send + Sync {
    async fn save(&self, person: &Person) -> Result<()>;
    async fn find_by_id(&self, id: PersonId) -> Result<Option<Person>>;
    async fn find_all(&self) -> Result<Vec<Person>>;
    /// Persons without a profile image, ordered by id.
    async fn find_missing_image(&self) -> Result<Vec<Person>>;
    async fn count(&self) -> Result<usize>;
    /// Deletes the person and, through the cascade, their queues.
    async fn delete_by_id(&self, id: PersonId) -> Result<bool>;
}

#[async_trait]
pub trait QueueRepository: Send + Sync {
    /// Create a queue at the end of the queue list.
    async fn create(&self, kind: QueueKind) -> Result<Queue>;
    async fn find_by_id(&self, id: QueueId) -> Result<Option<Queue>>;
    async fn find_for_person(&self, person_id: PersonId) -> Result<Option<Queue>>;
    /// All queues by position.
    async fn find_all(&self) -> Result<Vec<Queue>>;
    async fn reorder(&self, queue_ids: &[QueueId]) -> Result<()>;
    async fn delete_by_id(&self, id: QueueId) -> Result<bool>;
}

#[async_trait]
pub trait QueueFilmRepository: Send + Sync {
    /// Append a film; a second add of the same pair is `Error::AlreadyExists`.
    async fn add(&self, queue_id: QueueId, film_id: FilmId) -> Result<QueueFilm>;
    async fn remove(&self, queue_id: QueueId, film_id: FilmId) -> Result<bool>;
    async fn exists(&self, queue_id: QueueId, film_id: FilmId) -> Result<bool>;
    /// Members joined with their film rows, by position.
    async fn find_by_queue(&self, queue_id: QueueId) -> Result<Vec<QueueFilmEntry>>;
    async fn count_by_queue(&self, queue_id: QueueId) -> Result<usize>;
    async fn reorder(&self, queue_id: QueueId, film_ids: &[FilmId]) -> Result<()>;
}

/// SQLite-backed implementation of every repository contract.
#[derive(Clone)]
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl FilmRepository for SqliteRepository {
    async fn save(&self, film: &Film) -> Result<()> {
        let conn = get_conn(&self.pool)?;
        films::upsert_film(&conn, film)
    }

    async fn find_by_id(&self, id: FilmId) -> Result<Option<Film>> {
        let conn = get_conn(&self.pool)?;
        films::get_film(&conn, id)
    }

    async fn find_all(&self) -> Result<Vec<Film>> {
        let conn = get_conn(&self.pool)?;
        films::list_films(&conn)
    }

    async fn find_missing_data(&self) -> Result<Vec<Film>> {
        let conn = get_conn(&self.pool)?;
        films::list_films_missing_data(&conn)
    }

    async fn count(&self) -> Result<usize> {
        let conn = get_conn(&self.pool)?;
        films::count_films(&conn)
    }

    async fn delete_by_id(&self, id: FilmId) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        films::delete_film(&conn, id)
    }
}

#[async_trait]
impl PersonRepository for SqliteRepository {
    async fn save(&self, person: &Person) -> Result<()> {
        let conn = get_conn(&self.pool)?;
        persons::upsert_person(&conn, person)
    }

    async fn find_by_id(&self, id: PersonId) -> Result<Option<Person>> {
        let conn = get_conn(&self.pool)?;
        persons::get_person(&conn, id)
    }

    async fn find_all(&self) -> Result<Vec<Person>> {
        let conn = get_conn(&self.pool)?;
        persons::list_persons(&conn)
    }

    async fn find_missing_image(&self) -> Result<Vec<Person>> {
        let conn = get_conn(&self.pool)?;
        persons::list_persons_missing_image(&conn)
    }

    async fn count(&self) -> Result<usize> {
        let conn = get_conn(&self.pool)?;
        persons::count_persons(&conn)
    }

    async fn delete_by_id(&self, id: PersonId) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        persons::delete_person(&conn, id)
    }
}

#[async_trait]
impl QueueRepository for SqliteRepository {
    async fn create(&self, kind: QueueKind) -> Result<Queue> {
        let conn = get_conn(&self.pool)?;
        queues::create_queue(&conn, kind)
    }

    async fn find_by_id(&self, id: QueueId) -> Result<Option<Queue>> {
        let conn = get_conn(&self.pool)?;
        queues::get_queue(&conn, id)
    }

    async fn find_for_person(&self, person_id: PersonId) -> Result<Option<Queue>> {
        let conn = get_conn(&self.pool)?;
        queues::get_queue_for_person(&conn, person_id)
    }

    async fn find_all(&self) -> Result<Vec<Queue>> {
        let conn = get_conn(&self.pool)?;
        queues::list_queues(&conn)
    }

    async fn reorder(&self, queue_ids: &[QueueId]) -> Result<()> {
        let conn = get_conn(&self.pool)?;
        queues::reorder_queues(&conn, queue_ids)
    }

    async fn delete_by_id(&self, id: QueueId) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        queues::delete_queue(&conn, id)
    }
}

#[async_trait]
impl QueueFilmRepository for SqliteRepository {
    async fn add(&self, queue_id: QueueId, film_id: FilmId) -> Result<QueueFilm> {
        let conn = get_conn(&self.pool)?;
        queue_films::add_film(&conn, queue_id, film_id)
    }

    async fn remove(&self, queue_id: QueueId, film_id: FilmId) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        queue_films::remove_film(&conn, queue_id, film_id)
    }

    async fn exists(&self, queue_id: QueueId, film_id: FilmId) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        queue_films::is_film_in_queue(&conn, queue_id, film_id)
    }

    async fn find_by_queue(&self, queue_id: QueueId) -> Result<Vec<QueueFilmEntry>> {
        let conn = get_conn(&self.pool)?;
        queue_films::list_queue_films(&conn, queue_id)
    }

    async fn count_by_queue(&self, queue_id: QueueId) -> Result<usize> {
        let conn = get_conn(&self.pool)?;
        queue_films::count_queue_films(&conn, queue_id)
    }

    async fn reorder(&self, queue_id: QueueId, film_ids: &[FilmId]) -> Result<()> {
        let conn = get_conn(&self.pool)?;
        queue_films::reorder_queue_films(&conn, queue_id, film_ids)
    }
}
