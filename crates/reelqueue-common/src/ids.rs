//! Identifier types.
//!
//! Queues are owned by reelqueue and get a UUID newtype. Films and persons are
//! keyed by the metadata provider's numeric ID, which is globally unique per
//! record kind, so they are plain aliases.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Provider identifier of a film or TV show.
pub type FilmId = i64;

/// Provider identifier of a person.
pub type PersonId = i64;

/// Unique identifier for a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueueId(Uuid);

impl QueueId {
    /// Generate a new random queue ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for QueueId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for QueueId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<QueueId> for Uuid {
    fn from(id: QueueId) -> Self {
        id.0
    }
}

impl std::str::FromStr for QueueId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl std::fmt::Display for QueueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
