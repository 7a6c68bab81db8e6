//! Reelqueue-Common: Shared types, IDs, and error handling.
//!
//! This crate provides common functionality used across reelqueue:
//!
//! - **Typed IDs**: [`QueueId`] wraps a UUID, [`FilmId`] and [`PersonId`] alias
//!   the provider's numeric identifiers
//! - **Core Types**: person departments and queue kind tags
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use reelqueue_common::{Department, QueueId, Error, Result};
//!
//! let queue_id = QueueId::new();
//! assert_eq!("Directing".parse::<Department>().unwrap(), Department::Directing);
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("queue"))
//! }
//! ```

pub mod error;
pub mod ids;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
