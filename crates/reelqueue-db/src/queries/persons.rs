//! Person database queries.

use rusqlite::{Connection, Row};
use reelqueue_common::{Department, Error, PersonId, Result};

use crate::models::Person;
use crate::ordering;

fn parse_person_row(row: &Row<'_>) -> rusqlite::Result<Person> {
    let department: String = row.get(2)?;
    Ok(Person {
        id: row.get(0)?,
        name: row.get(1)?,
        department: Department::from_label(&department),
        image_path: row.get(3)?,
    })
}

/// Insert or replace a person.
pub fn upsert_person(conn: &Connection, person: &Person) -> Result<()> {
    conn.execute(
        "INSERT INTO persons (id, name, department, image_path)
         VALUES (:id, :name, :department, :image_path)
         ON CONFLICT(id) DO UPDATE SET
            name = :name,
            department = :department,
            image_path = :image_path",
        rusqlite::named_params! {
            ":id": person.id,
            ":name": person.name,
            ":department": person.department.to_string(),
            ":image_path": person.image_path,
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(())
}

/// Get a person by provider ID.
///
/// # Returns
///
/// * `Ok(Some(Person))` - The person if found
/// * `Ok(None)` - If the person does not exist
/// * `Err(Error)` - If a database error occurs
pub fn get_person(conn: &Connection, id: PersonId) -> Result<Option<Person>> {
    let result = conn.query_row(
        "SELECT id, name, department, image_path FROM persons WHERE id = :id",
        rusqlite::named_params! { ":id": id },
        parse_person_row,
    );

    match result {
        Ok(person) => Ok(Some(person)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

fn query_persons(conn: &Connection, sql: &str) -> Result<Vec<Person>> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| Error::database(e.to_string()))?;

    let persons = stmt
        .query_map([], parse_person_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(persons)
}

/// List all persons ordered by name.
pub fn list_persons(conn: &Connection) -> Result<Vec<Person>> {
    query_persons(
        conn,
        "SELECT id, name, department, image_path FROM persons ORDER BY name, id",
    )
}

/// List persons without a profile image, ordered by ID.
pub fn list_persons_missing_image(conn: &Connection) -> Result<Vec<Person>> {
    query_persons(
        conn,
        "SELECT id, name, department, image_path FROM persons
         WHERE image_path IS NULL OR image_path = ''
         ORDER BY id",
    )
}

/// Count all stored persons.
pub fn count_persons(conn: &Connection) -> Result<usize> {
    conn.query_row("SELECT COUNT(*) FROM persons", [], |row| row.get::<_, i64>(0))
        .map(|n| n as usize)
        .map_err(|e| Error::database(e.to_string()))
}

/// Delete a person together with their queues.
///
/// The person's queues (and their memberships) cascade; the remaining queues
/// are renumbered in the same transaction so queue positions stay dense.
///
/// # Returns
///
/// * `Ok(true)` - If the person was deleted
/// * `Ok(false)` - If the person did not exist
/// * `Err(Error)` - If a database error occurs
pub fn delete_person(conn: &Connection, id: PersonId) -> Result<bool> {
    let tx = ordering::immediate_transaction(conn)?;

    let rows_affected = tx
        .execute(
            "DELETE FROM persons WHERE id = :id",
            rusqlite::named_params! { ":id": id },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    if rows_affected > 0 {
        super::queues::compact_positions(&tx)?;
    }

    tx.commit().map_err(|e| Error::database(e.to_string()))?;

    Ok(rows_affected > 0)
}
