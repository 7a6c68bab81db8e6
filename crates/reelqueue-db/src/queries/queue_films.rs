//! Queue membership queries.
//!
//! Each queue's films form their own sibling set: `sort_order` is dense and
//! zero-based per `queue_id`. The `(queue_id, film_id)` primary key rejects a
//! second insert of the same pair, which is reported as
//! [`Error::AlreadyExists`].

use chrono::Utc;
use rusqlite::{Connection, Row};
use reelqueue_common::{Error, FilmId, QueueId, Result};

use super::films::parse_film_row;
use super::{constraint_code, parse_queue_id, parse_timestamp};
use crate::models::{QueueFilm, QueueFilmEntry};
use crate::ordering;

fn parse_queue_film_row(row: &Row<'_>) -> rusqlite::Result<QueueFilm> {
    Ok(QueueFilm {
        queue_id: parse_queue_id(0, &row.get::<_, String>(0)?)?,
        film_id: row.get(1)?,
        added_at: parse_timestamp(2, &row.get::<_, String>(2)?)?,
        sort_order: row.get(3)?,
    })
}

/// Add a film to the end of a queue.
///
/// The position is computed inside the insert statement, so two concurrent
/// adds to one queue never receive the same position.
///
/// # Returns
///
/// * `Ok(QueueFilm)` - The created membership
/// * `Err(Error::AlreadyExists)` - If the film is already in the queue
/// * `Err(Error::NotFound)` - If the queue or the film row does not exist
/// * `Err(Error)` - If a database error occurs
pub fn add_film(conn: &Connection, queue_id: QueueId, film_id: FilmId) -> Result<QueueFilm> {
    let added_at = Utc::now();

    let sort_order: i64 = conn
        .query_row(
            "INSERT INTO queue_films (queue_id, film_id, added_at, sort_order)
             SELECT :queue_id, :film_id, :added_at, COALESCE(MAX(sort_order) + 1, 0)
             FROM queue_films WHERE queue_id = :queue_id
             RETURNING sort_order",
            rusqlite::named_params! {
                ":queue_id": queue_id.to_string(),
                ":film_id": film_id,
                ":added_at": added_at.to_rfc3339(),
            },
            |row| row.get(0),
        )
        .map_err(|e| match constraint_code(&e) {
            Some(rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
            | Some(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE) => {
                Error::already_exists(format!("film {} in queue {}", film_id, queue_id))
            }
            Some(rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => {
                Error::not_found(format!("queue {} or film {}", queue_id, film_id))
            }
            _ => Error::database(e.to_string()),
        })?;

    Ok(QueueFilm {
        queue_id,
        film_id,
        added_at,
        sort_order,
    })
}

/// Whether `film_id` is a member of `queue_id`.
pub fn is_film_in_queue(conn: &Connection, queue_id: QueueId, film_id: FilmId) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM queue_films WHERE queue_id = :queue_id AND film_id = :film_id)",
        rusqlite::named_params! {
            ":queue_id": queue_id.to_string(),
            ":film_id": film_id,
        },
        |row| row.get(0),
    )
    .map_err(|e| Error::database(e.to_string()))
}

/// List a queue's memberships in position order.
pub fn list_memberships(conn: &Connection, queue_id: QueueId) -> Result<Vec<QueueFilm>> {
    let mut stmt = conn
        .prepare(
            "SELECT queue_id, film_id, added_at, sort_order FROM queue_films
             WHERE queue_id = :queue_id
             ORDER BY sort_order, added_at",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let rows = stmt
        .query_map(
            rusqlite::named_params! { ":queue_id": queue_id.to_string() },
            parse_queue_film_row,
        )
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(rows)
}

/// List a queue's films, joined with their film rows, in position order.
pub fn list_queue_films(conn: &Connection, queue_id: QueueId) -> Result<Vec<QueueFilmEntry>> {
    let mut stmt = conn
        .prepare(
            "SELECT f.id, f.title, f.original_title, f.release_date, f.runtime_minutes,
                    f.genres, f.poster_path, f.is_tv, qf.added_at, qf.sort_order
             FROM queue_films qf
             JOIN films f ON f.id = qf.film_id
             WHERE qf.queue_id = :queue_id
             ORDER BY qf.sort_order, qf.added_at",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let entries = stmt
        .query_map(
            rusqlite::named_params! { ":queue_id": queue_id.to_string() },
            |row| {
                Ok(QueueFilmEntry {
                    film: parse_film_row(row)?,
                    added_at: parse_timestamp(8, &row.get::<_, String>(8)?)?,
                    sort_order: row.get(9)?,
                })
            },
        )
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(entries)
}

fn list_film_ids(conn: &Connection, queue_id: &str) -> Result<Vec<FilmId>> {
    let mut stmt = conn
        .prepare(
            "SELECT film_id FROM queue_films WHERE queue_id = :queue_id
             ORDER BY sort_order, added_at",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let ids = stmt
        .query_map(rusqlite::named_params! { ":queue_id": queue_id }, |row| {
            row.get::<_, FilmId>(0)
        })
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(ids)
}

fn write_film_order(conn: &Connection, queue_id: &str, order: &[FilmId]) -> Result<()> {
    ordering::renumber(conn, order, |c, film_id, position| {
        c.execute(
            "UPDATE queue_films SET sort_order = :sort_order
             WHERE queue_id = :queue_id AND film_id = :film_id",
            rusqlite::named_params! {
                ":sort_order": position,
                ":queue_id": queue_id,
                ":film_id": film_id,
            },
        )
    })
}

/// Reorder the films of one queue.
///
/// `film_ids` take positions `0..` in the given order; members not listed
/// keep their relative order after them. IDs that are not members are
/// ignored. The read and all writes happen in one immediate transaction.
pub fn reorder_queue_films(conn: &Connection, queue_id: QueueId, film_ids: &[FilmId]) -> Result<()> {
    let queue_key = queue_id.to_string();

    let tx = ordering::immediate_transaction(conn)?;
    let current = list_film_ids(&tx, &queue_key)?;
    let order = ordering::resolve_order(film_ids, &current);
    write_film_order(&tx, &queue_key, &order)?;
    tx.commit().map_err(|e| Error::database(e.to_string()))?;

    Ok(())
}

/// Remove a film from a queue and close the gap it leaves.
///
/// # Returns
///
/// * `Ok(true)` - If the film was removed
/// * `Ok(false)` - If the film was not in the queue
/// * `Err(Error)` - If a database error occurs
pub fn remove_film(conn: &Connection, queue_id: QueueId, film_id: FilmId) -> Result<bool> {
    let queue_key = queue_id.to_string();

    let tx = ordering::immediate_transaction(conn)?;
    let rows_affected = tx
        .execute(
            "DELETE FROM queue_films WHERE queue_id = :queue_id AND film_id = :film_id",
            rusqlite::named_params! {
                ":queue_id": queue_key,
                ":film_id": film_id,
            },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    if rows_affected > 0 {
        let current = list_film_ids(&tx, &queue_key)?;
        write_film_order(&tx, &queue_key, &current)?;
    }

    tx.commit().map_err(|e| Error::database(e.to_string()))?;

    Ok(rows_affected > 0)
}

/// Count the films of one queue.
pub fn count_queue_films(conn: &Connection, queue_id: QueueId) -> Result<usize> {
    conn.query_row(
        "SELECT COUNT(*) FROM queue_films WHERE queue_id = :queue_id",
        rusqlite::named_params! { ":queue_id": queue_id.to_string() },
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n as usize)
    .map_err(|e| Error::database(e.to_string()))
}
