//! Sort-position assignment for sibling sets.
//!
//! A sibling set is either every queue, or every film of one queue. Positions
//! inside a set are always `0..n` in display order. New members are appended
//! after the current maximum, and a reorder renumbers the whole set inside a
//! single `BEGIN IMMEDIATE` transaction so readers never see a half-applied
//! sequence.

use std::collections::HashSet;
use std::hash::Hash;

use reelqueue_common::{Error, Result};
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Position for a new member: one past the current maximum, or `0` when the
/// set is empty.
pub fn next_position(positions: &[i64]) -> i64 {
    positions.iter().max().map_or(0, |max| max + 1)
}

/// Compute the full order for a reorder request.
///
/// `current` is the set in its present order. Ids from `desired` that are
/// members come first, in the requested order; duplicates keep their first
/// occurrence and unknown ids are dropped. Members missing from `desired`
/// follow in their existing relative order.
pub fn resolve_order<K>(desired: &[K], current: &[K]) -> Vec<K>
where
    K: Eq + Hash + Clone,
{
    let members: HashSet<&K> = current.iter().collect();
    let mut placed: HashSet<&K> = HashSet::with_capacity(current.len());
    let mut order = Vec::with_capacity(current.len());

    for id in desired {
        if members.contains(id) && placed.insert(id) {
            order.push(id.clone());
        }
    }
    for id in current {
        if placed.insert(id) {
            order.push(id.clone());
        }
    }

    order
}

/// Start a write transaction that takes the database write lock immediately.
///
/// Taking the lock up front means two concurrent reorders queue behind each
/// other instead of failing when both try to upgrade a read lock.
pub fn immediate_transaction(conn: &Connection) -> Result<Transaction<'_>> {
    Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
        .map_err(|e| Error::database(format!("Failed to begin transaction: {}", e)))
}

/// Write positions `0..order.len()` through `write_position`.
///
/// Callers run this inside an open transaction.
pub fn renumber<K, F>(conn: &Connection, order: &[K], mut write_position: F) -> Result<()>
where
    F: FnMut(&Connection, &K, i64) -> rusqlite::Result<usize>,
{
    for (position, id) in order.iter().enumerate() {
        write_position(conn, id, position as i64)
            .map_err(|e| Error::database(format!("Failed to write sort position: {}", e)))?;
    }
    Ok(())
}
