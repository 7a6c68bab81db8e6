//! Reelqueue-DB: Database schema, migrations, ordering, and query operations
//!
//! This crate provides database functionality for reelqueue using SQLite
//! with rusqlite and r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database schema
//! - `ordering` - Dense sort-position assignment for sibling sets
//! - `queries` - Database query operations
//!
//! # Example
//!
//! ```no_run
//! use reelqueue_db::pool::{init_pool, get_conn};
//! use reelqueue_db::queries::queues;
//!
//! let pool = init_pool("/var/lib/reelqueue/reelqueue.db").unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! for queue in queues::list_queues(&conn).unwrap() {
//!     println!("{} at position {}", queue.id, queue.sort_order);
//! }
//! ```

pub mod migrations;
pub mod models;
pub mod ordering;
pub mod pool;
pub mod queries;
