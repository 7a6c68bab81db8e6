//! Running the enabled enrichment passes.

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::{EnrichmentReport, FilmEnrichmentService, PersonEnrichmentService};

/// Reports of the passes that ran. `None` means disabled or failed to start.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EnrichmentRun {
    pub films: Option<EnrichmentReport>,
    pub persons: Option<EnrichmentReport>,
}

/// Run the film pass, then the person pass. A pass that cannot load its
/// candidates is logged and does not prevent the other.
pub async fn run_enrichment(
    films: Option<&FilmEnrichmentService>,
    persons: Option<&PersonEnrichmentService>,
) -> EnrichmentRun {
    let mut run = EnrichmentRun::default();

    if let Some(service) = films {
        match service.enrich_missing_data().await {
            Ok(report) => {
                info!(summary = %report.summary, "Film enrichment pass complete");
                run.films = Some(report);
            }
            Err(e) => error!(error = %e, "Film enrichment pass aborted"),
        }
    }

    if let Some(service) = persons {
        match service.enrich_missing_data().await {
            Ok(report) => {
                info!(summary = %report.summary, "Person enrichment pass complete");
                run.persons = Some(report);
            }
            Err(e) => error!(error = %e, "Person enrichment pass aborted"),
        }
    }

    run
}

/// Start the enabled passes on a background task. Returns `None` when both
/// are disabled.
pub fn spawn_enrichment(
    films: Option<FilmEnrichmentService>,
    persons: Option<PersonEnrichmentService>,
) -> Option<JoinHandle<EnrichmentRun>> {
    if films.is_none() && persons.is_none() {
        info!("Enrichment disabled");
        return None;
    }

    info!(
        films = films.is_some(),
        persons = persons.is_some(),
        "Starting background enrichment"
    );
    Some(tokio::spawn(async move {
        run_enrichment(films.as_ref(), persons.as_ref()).await
    }))
}
