//! Core type definitions shared by the store and the services.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Department a person is primarily known for.
///
/// Stored and displayed in upper case. Parsing never fails: anything that is
/// not recognised becomes [`Department::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Department {
    Acting,
    Directing,
    Writing,
    #[default]
    Other,
}

impl Department {
    /// Parse a department label, falling back to [`Department::Other`].
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "ACTING" | "ACTOR" => Self::Acting,
            "DIRECTING" | "DIRECTOR" => Self::Directing,
            "WRITING" | "WRITER" => Self::Writing,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Acting => write!(f, "ACTING"),
            Self::Directing => write!(f, "DIRECTING"),
            Self::Writing => write!(f, "WRITING"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}

impl std::str::FromStr for Department {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

/// Discriminator stored in the `queues.kind` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueueKindTag {
    /// A queue built from one person's filmography.
    PersonQueue,
}

impl fmt::Display for QueueKindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PersonQueue => write!(f, "person-queue"),
        }
    }
}

impl std::str::FromStr for QueueKindTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "person-queue" => Ok(Self::PersonQueue),
            _ => Err(format!("Invalid queue kind: {}", s)),
        }
    }
}
