//! Background backfill of missing film and person metadata.
//!
//! Each pass loads its candidates once and walks them sequentially, sleeping
//! [`RATE_LIMIT`] between records. A failing record is logged and counted;
//! it never stops the pass.
//!
//! - [`films`] -- Runtime, genres and poster for stored films.
//! - [`persons`] -- Profile images for stored persons.
//! - [`merge`] -- Fill-if-missing merge of fetched film details.
//! - [`runner`] -- Startup task that runs the enabled passes.

pub mod films;
pub mod merge;
pub mod persons;
pub mod runner;

use std::time::Duration;

use serde::Serialize;

pub use films::FilmEnrichmentService;
pub use merge::merge_film;
pub use persons::PersonEnrichmentService;
pub use runner::{run_enrichment, spawn_enrichment, EnrichmentRun};

/// Delay between two consecutive records of a pass.
pub const RATE_LIMIT: Duration = Duration::from_millis(250);

/// Outcome of one enrichment pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentReport {
    /// Rows in the table when the pass started.
    pub total: usize,
    /// Rows selected for enrichment.
    pub candidate_count: usize,
    pub enriched_count: usize,
    pub failed_count: usize,
    pub summary: String,
}

impl EnrichmentReport {
    fn nothing_to_do(total: usize, what: &str) -> Self {
        Self {
            total,
            summary: format!("All {total} {what} already have complete metadata"),
            ..Self::default()
        }
    }
}

/// Sleep between records, never after the last one.
async fn pace(index: usize, delay: Duration) {
    if index > 0 && !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
