//! Person profile image backfill.

use std::sync::Arc;
use std::time::Duration;

use reelqueue_common::Result;
use reelqueue_db::models::Person;
use tracing::{debug, info, warn};

use super::{pace, EnrichmentReport, RATE_LIMIT};
use crate::metadata::{image_url, MetadataProvider};
use crate::repository::PersonRepository;

/// Fills in the profile image of persons stored without one.
pub struct PersonEnrichmentService {
    provider: Arc<dyn MetadataProvider>,
    persons: Arc<dyn PersonRepository>,
    delay: Duration,
}

impl PersonEnrichmentService {
    pub fn new(provider: Arc<dyn MetadataProvider>, persons: Arc<dyn PersonRepository>) -> Self {
        Self {
            provider,
            persons,
            delay: RATE_LIMIT,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Run one pass over every person without an image.
    ///
    /// Persons the provider has no image for are left untouched and counted
    /// neither as enriched nor as failed.
    pub async fn enrich_missing_data(&self) -> Result<EnrichmentReport> {
        let total = self.persons.count().await?;
        let candidates = self.persons.find_missing_image().await?;
        debug_assert!(candidates.iter().all(Person::needs_enrichment));

        if candidates.is_empty() {
            info!(total = total, "No persons need enrichment");
            return Ok(EnrichmentReport::nothing_to_do(total, "persons"));
        }

        info!(
            total = total,
            candidates = candidates.len(),
            "Starting person enrichment"
        );

        let mut enriched = 0;
        let mut failed = 0;
        let mut without_image = 0;
        for (index, person) in candidates.iter().enumerate() {
            pace(index, self.delay).await;

            let details = match self.provider.get_person_details(person.id).await {
                Ok(details) => details,
                Err(e) => {
                    warn!(person_id = person.id, error = %e, "Person enrichment failed; continuing with next person");
                    failed += 1;
                    continue;
                }
            };

            let Some(profile_path) = details.profile_path.filter(|p| !p.is_empty()) else {
                debug!(person_id = person.id, "Provider has no profile image");
                without_image += 1;
                continue;
            };

            let updated = Person {
                image_path: Some(image_url(&profile_path)),
                ..person.clone()
            };
            match self.persons.save(&updated).await {
                Ok(()) => {
                    info!(person_id = person.id, name = %person.name, "Enriched person");
                    enriched += 1;
                }
                Err(e) => {
                    warn!(person_id = person.id, error = %e, "Failed to store enriched person");
                    failed += 1;
                }
            }
        }

        let summary = format!(
            "Enriched {enriched} of {} persons ({failed} failed, {without_image} without image)",
            candidates.len()
        );
        info!(enriched = enriched, failed = failed, "Person enrichment finished");

        Ok(EnrichmentReport {
            total,
            candidate_count: candidates.len(),
            enriched_count: enriched,
            failed_count: failed,
            summary,
        })
    }
}
