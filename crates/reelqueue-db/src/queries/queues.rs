//! Queue database queries.
//!
//! All queues form one sibling set: `sort_order` is dense and zero-based
//! across the whole table.

use chrono::Utc;
use rusqlite::{Connection, Row};
use reelqueue_common::{Error, PersonId, QueueId, QueueKindTag, Result};

use super::{constraint_code, parse_queue_id, parse_timestamp};
use crate::models::{Queue, QueueKind};
use crate::ordering;

fn parse_queue_row(row: &Row<'_>) -> rusqlite::Result<Queue> {
    let id = parse_queue_id(0, &row.get::<_, String>(0)?)?;
    let tag: String = row.get(1)?;
    let person_id: Option<PersonId> = row.get(2)?;

    let kind = match tag.parse::<QueueKindTag>() {
        Ok(QueueKindTag::PersonQueue) => QueueKind::PersonQueue {
            person_id: person_id.ok_or_else(|| {
                rusqlite::Error::InvalidColumnType(
                    2,
                    "person_id".to_string(),
                    rusqlite::types::Type::Null,
                )
            })?,
        },
        Err(e) => {
            return Err(rusqlite::Error::FromSqlConversionFailure(
                1,
                rusqlite::types::Type::Text,
                e.into(),
            ))
        }
    };

    Ok(Queue {
        id,
        kind,
        created_at: parse_timestamp(3, &row.get::<_, String>(3)?)?,
        sort_order: row.get(4)?,
    })
}

/// Create a queue at the end of the queue list.
///
/// The position is computed by the insert statement itself, so concurrent
/// creations cannot both observe the same maximum.
///
/// # Returns
///
/// * `Ok(Queue)` - The created queue
/// * `Err(Error::AlreadyExists)` - If the person already has a queue
/// * `Err(Error::NotFound)` - If the referenced person does not exist
/// * `Err(Error)` - If a database error occurs
pub fn create_queue(conn: &Connection, kind: QueueKind) -> Result<Queue> {
    let id = QueueId::new();
    let created_at = Utc::now();

    let sort_order: i64 = conn
        .query_row(
            "INSERT INTO queues (id, kind, person_id, created_at, sort_order)
             SELECT :id, :kind, :person_id, :created_at, COALESCE(MAX(sort_order) + 1, 0)
             FROM queues
             RETURNING sort_order",
            rusqlite::named_params! {
                ":id": id.to_string(),
                ":kind": kind.tag().to_string(),
                ":person_id": kind.person_id(),
                ":created_at": created_at.to_rfc3339(),
            },
            |row| row.get(0),
        )
        .map_err(|e| match constraint_code(&e) {
            Some(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE) => {
                Error::already_exists(format!("queue for {:?}", kind))
            }
            Some(rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => {
                Error::not_found(format!("person for {:?}", kind))
            }
            _ => Error::database(e.to_string()),
        })?;

    Ok(Queue {
        id,
        kind,
        created_at,
        sort_order,
    })
}

/// Get a queue by ID.
///
/// # Returns
///
/// * `Ok(Some(Queue))` - The queue if found
/// * `Ok(None)` - If the queue does not exist
/// * `Err(Error)` - If a database error occurs
pub fn get_queue(conn: &Connection, id: QueueId) -> Result<Option<Queue>> {
    let result = conn.query_row(
        "SELECT id, kind, person_id, created_at, sort_order FROM queues WHERE id = :id",
        rusqlite::named_params! { ":id": id.to_string() },
        parse_queue_row,
    );

    match result {
        Ok(queue) => Ok(Some(queue)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Get the person-queue of a person, if one exists.
pub fn get_queue_for_person(conn: &Connection, person_id: PersonId) -> Result<Option<Queue>> {
    let result = conn.query_row(
        "SELECT id, kind, person_id, created_at, sort_order FROM queues
         WHERE kind = :kind AND person_id = :person_id",
        rusqlite::named_params! {
            ":kind": QueueKindTag::PersonQueue.to_string(),
            ":person_id": person_id,
        },
        parse_queue_row,
    );

    match result {
        Ok(queue) => Ok(Some(queue)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List all queues in display order.
pub fn list_queues(conn: &Connection) -> Result<Vec<Queue>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, kind, person_id, created_at, sort_order FROM queues
             ORDER BY sort_order, created_at",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let queues = stmt
        .query_map([], parse_queue_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(queues)
}

fn list_queue_ids(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT id FROM queues ORDER BY sort_order, created_at")
        .map_err(|e| Error::database(e.to_string()))?;

    let ids = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(ids)
}

fn write_queue_order(conn: &Connection, order: &[String]) -> Result<()> {
    ordering::renumber(conn, order, |c, id, position| {
        c.execute(
            "UPDATE queues SET sort_order = :sort_order WHERE id = :id",
            rusqlite::named_params! { ":sort_order": position, ":id": id },
        )
    })
}

/// Renumber all queues `0..n` keeping their current order.
///
/// Runs on the caller's connection; callers hold the transaction.
pub(crate) fn compact_positions(conn: &Connection) -> Result<()> {
    let current = list_queue_ids(conn)?;
    write_queue_order(conn, &current)
}

/// Reorder queues.
///
/// `queue_ids` take positions `0..` in the given order; queues not listed
/// keep their relative order after them. Unknown IDs are ignored. The read
/// and all writes happen in one immediate transaction.
pub fn reorder_queues(conn: &Connection, queue_ids: &[QueueId]) -> Result<()> {
    let desired: Vec<String> = queue_ids.iter().map(ToString::to_string).collect();

    let tx = ordering::immediate_transaction(conn)?;
    let current = list_queue_ids(&tx)?;
    let order = ordering::resolve_order(&desired, &current);
    write_queue_order(&tx, &order)?;
    tx.commit().map_err(|e| Error::database(e.to_string()))?;

    Ok(())
}

/// Delete a queue and its memberships, then close the gap it leaves.
///
/// # Returns
///
/// * `Ok(true)` - If the queue was deleted
/// * `Ok(false)` - If the queue did not exist
/// * `Err(Error)` - If a database error occurs
pub fn delete_queue(conn: &Connection, id: QueueId) -> Result<bool> {
    let tx = ordering::immediate_transaction(conn)?;

    let rows_affected = tx
        .execute(
            "DELETE FROM queues WHERE id = :id",
            rusqlite::named_params! { ":id": id.to_string() },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    if rows_affected > 0 {
        compact_positions(&tx)?;
    }

    tx.commit().map_err(|e| Error::database(e.to_string()))?;

    Ok(rows_affected > 0)
}
