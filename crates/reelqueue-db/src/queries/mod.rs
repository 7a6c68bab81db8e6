//! Database query modules.
//!
//! This module organizes all database operations into logical groups:
//! - films: Film upsert, lookup, and enrichment candidates
//! - persons: Person CRUD and enrichment candidates
//! - queues: Queue creation, listing, deletion, and reordering
//! - queue_films: Queue membership, ordered listing, and reordering

pub mod films;
pub mod persons;
pub mod queue_films;
pub mod queues;

use chrono::{DateTime, Utc};
use reelqueue_common::QueueId;

/// Parse an RFC 3339 timestamp column.
pub(crate) fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Parse a queue ID column.
pub(crate) fn parse_queue_id(idx: usize, value: &str) -> rusqlite::Result<QueueId> {
    value.parse::<QueueId>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Extended result code of a constraint violation, if `err` is one.
pub(crate) fn constraint_code(err: &rusqlite::Error) -> Option<i32> {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
            Some(e.extended_code)
        }
        _ => None,
    }
}
