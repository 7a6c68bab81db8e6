//! Film database queries.
//!
//! Films are keyed by the provider's ID. Writes are upserts: saving a film
//! whose ID already exists replaces every column of the stored row.

use rusqlite::{Connection, Row};
use reelqueue_common::{Error, FilmId, Result};

use crate::models::{genres_from_column, genres_to_column, Film};

const FILM_COLUMNS: &str =
    "id, title, original_title, release_date, runtime_minutes, genres, poster_path, is_tv";

pub(crate) fn parse_film_row(row: &Row<'_>) -> rusqlite::Result<Film> {
    Ok(Film {
        id: row.get(0)?,
        title: row.get(1)?,
        original_title: row.get(2)?,
        release_date: row.get(3)?,
        runtime_minutes: row.get(4)?,
        genres: genres_from_column(row.get(5)?),
        poster_path: row.get(6)?,
        is_tv: row.get(7)?,
    })
}

/// Insert or replace a film.
///
/// # Returns
///
/// * `Ok(())` - If the operation succeeded
/// * `Err(Error)` - If a database error occurs
pub fn upsert_film(conn: &Connection, film: &Film) -> Result<()> {
    conn.execute(
        "INSERT INTO films (
            id, title, original_title, release_date, runtime_minutes, genres, poster_path, is_tv
         ) VALUES (
            :id, :title, :original_title, :release_date, :runtime_minutes, :genres, :poster_path, :is_tv
         )
         ON CONFLICT(id) DO UPDATE SET
            title = :title,
            original_title = :original_title,
            release_date = :release_date,
            runtime_minutes = :runtime_minutes,
            genres = :genres,
            poster_path = :poster_path,
            is_tv = :is_tv",
        rusqlite::named_params! {
            ":id": film.id,
            ":title": film.title,
            ":original_title": film.original_title,
            ":release_date": film.release_date,
            ":runtime_minutes": film.runtime_minutes,
            ":genres": genres_to_column(&film.genres),
            ":poster_path": film.poster_path,
            ":is_tv": film.is_tv,
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(())
}

/// Get a film by provider ID.
///
/// # Returns
///
/// * `Ok(Some(Film))` - The film if found
/// * `Ok(None)` - If the film does not exist
/// * `Err(Error)` - If a database error occurs
pub fn get_film(conn: &Connection, id: FilmId) -> Result<Option<Film>> {
    let result = conn.query_row(
        &format!("SELECT {FILM_COLUMNS} FROM films WHERE id = :id"),
        rusqlite::named_params! { ":id": id },
        parse_film_row,
    );

    match result {
        Ok(film) => Ok(Some(film)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List all films ordered by ID.
pub fn list_films(conn: &Connection) -> Result<Vec<Film>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {FILM_COLUMNS} FROM films ORDER BY id"))
        .map_err(|e| Error::database(e.to_string()))?;

    let films = stmt
        .query_map([], parse_film_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(films)
}

/// List films missing a runtime, genres, or a poster, ordered by ID.
pub fn list_films_missing_data(conn: &Connection) -> Result<Vec<Film>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {FILM_COLUMNS} FROM films
             WHERE runtime_minutes IS NULL
                OR genres IS NULL OR genres = ''
                OR poster_path IS NULL OR poster_path = ''
             ORDER BY id"
        ))
        .map_err(|e| Error::database(e.to_string()))?;

    let films = stmt
        .query_map([], parse_film_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(films)
}

/// Count all stored films.
pub fn count_films(conn: &Connection) -> Result<usize> {
    conn.query_row("SELECT COUNT(*) FROM films", [], |row| row.get::<_, i64>(0))
        .map(|n| n as usize)
        .map_err(|e| Error::database(e.to_string()))
}

/// Delete a film that no queue references.
///
/// # Returns
///
/// * `Ok(true)` - If the film was deleted
/// * `Ok(false)` - If the film did not exist
/// * `Err(Error)` - If the film is still queued or a database error occurs
pub fn delete_film(conn: &Connection, id: FilmId) -> Result<bool> {
    let rows_affected = conn
        .execute(
            "DELETE FROM films WHERE id = :id",
            rusqlite::named_params! { ":id": id },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;

    fn film(id: FilmId, title: &str) -> Film {
        Film {
            id,
            title: title.to_string(),
            original_title: None,
            release_date: Some("1962-04-11".to_string()),
            runtime_minutes: Some(90),
            genres: vec!["Drama".to_string()],
            poster_path: Some("/cleo.jpg".to_string()),
            is_tv: false,
        }
    }

    #[test]
    fn test_upsert_and_get_film() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let f = film(1, "Cléo from 5 to 7");
        upsert_film(&conn, &f).unwrap();

        let found = get_film(&conn, 1).unwrap().unwrap();
        assert_eq!(found, f);
    }

    #[test]
    fn test_get_film_not_found() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        assert!(get_film(&conn, 404).unwrap().is_none());
    }

    #[test]
    fn test_upsert_twice_keeps_one_row_with_second_values() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        upsert_film(&conn, &film(1, "First")).unwrap();
        let mut second = film(1, "Second");
        second.runtime_minutes = None;
        second.genres = vec![];
        upsert_film(&conn, &second).unwrap();

        assert_eq!(count_films(&conn).unwrap(), 1);
        let stored = get_film(&conn, 1).unwrap().unwrap();
        assert_eq!(stored, second);
    }

    #[test]
    fn test_list_films_missing_data() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        upsert_film(&conn, &film(1, "Complete")).unwrap();

        let mut no_runtime = film(2, "No runtime");
        no_runtime.runtime_minutes = None;
        upsert_film(&conn, &no_runtime).unwrap();

        let mut no_genres = film(3, "No genres");
        no_genres.genres.clear();
        upsert_film(&conn, &no_genres).unwrap();

        let mut empty_poster = film(4, "Empty poster");
        empty_poster.poster_path = Some(String::new());
        upsert_film(&conn, &empty_poster).unwrap();

        let ids: Vec<FilmId> = list_films_missing_data(&conn)
            .unwrap()
            .into_iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(ids, vec![2, 3, 4]);
        for f in list_films(&conn).unwrap() {
            assert_eq!(f.needs_enrichment(), ids.contains(&f.id), "film {}", f.id);
        }
        assert_eq!(list_films(&conn).unwrap().len(), 4);
    }

    #[test]
    fn test_delete_film() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        upsert_film(&conn, &film(1, "Gone")).unwrap();
        assert!(delete_film(&conn, 1).unwrap());
        assert!(!delete_film(&conn, 1).unwrap());
    }
}
