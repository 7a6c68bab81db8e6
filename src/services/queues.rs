//! Person selection and the ordered list of queues.

use std::collections::HashSet;
use std::sync::Arc;

use reelqueue_common::{Department, Error, FilmId, PersonId, QueueId, Result};
use reelqueue_db::models::{Person, Queue, QueueKind};
use serde::Serialize;
use tracing::{info, warn};

use crate::metadata::{image_url, Credit, MetadataProvider, PersonDetails};
use crate::repository::{PersonRepository, QueueFilmRepository, QueueRepository};

/// Name and department to store when the provider cannot describe a person.
#[derive(Debug, Clone)]
pub struct PersonSeed {
    pub name: String,
    pub department: Department,
}

/// A queue with the data a listing shows next to it.
#[derive(Debug, Clone, Serialize)]
pub struct QueueOverview {
    pub queue: Queue,
    pub person: Option<Person>,
    pub film_count: usize,
}

/// A filmography credit, flagged when it is already queued.
#[derive(Debug, Clone, Serialize)]
pub struct FilmographyEntry {
    pub credit: Credit,
    pub in_queue: bool,
}

pub struct QueueService {
    provider: Arc<dyn MetadataProvider>,
    persons: Arc<dyn PersonRepository>,
    queues: Arc<dyn QueueRepository>,
    queue_films: Arc<dyn QueueFilmRepository>,
}

impl QueueService {
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        persons: Arc<dyn PersonRepository>,
        queues: Arc<dyn QueueRepository>,
        queue_films: Arc<dyn QueueFilmRepository>,
    ) -> Self {
        Self {
            provider,
            persons,
            queues,
            queue_films,
        }
    }

    /// Store a person and return their queue, creating it at the end of the
    /// queue list if they have none yet.
    ///
    /// Provider failures fall back to the stored row, then to `seed`. With
    /// neither available the selection fails with `Error::Provider`.
    pub async fn select_person(
        &self,
        person_id: PersonId,
        seed: Option<PersonSeed>,
    ) -> Result<Queue> {
        let details = if self.provider.is_available() {
            self.provider.get_person_details(person_id).await
        } else {
            Err(anyhow::anyhow!("{} has no credentials", self.provider.name()))
        };
        let person = match details {
            Ok(details) => Some(person_from_details(details)),
            Err(e) => {
                warn!(person_id = person_id, error = %e, "Could not fetch person details");
                match self.persons.find_by_id(person_id).await? {
                    Some(existing) => Some(existing),
                    None => seed.map(|s| Person {
                        id: person_id,
                        name: s.name,
                        department: s.department,
                        image_path: None,
                    }),
                }
            }
        };
        let person = person.ok_or_else(|| {
            Error::provider(format!("no details available for person {person_id}"))
        })?;
        self.persons.save(&person).await?;

        if let Some(queue) = self.queues.find_for_person(person_id).await? {
            return Ok(queue);
        }

        match self
            .queues
            .create(QueueKind::PersonQueue { person_id })
            .await
        {
            Ok(queue) => {
                info!(
                    queue_id = %queue.id,
                    person_id = person_id,
                    name = %person.name,
                    position = queue.sort_order,
                    "Created person queue"
                );
                Ok(queue)
            }
            // Another caller created it between the lookup and the insert.
            Err(e) if e.is_already_exists() => self
                .queues
                .find_for_person(person_id)
                .await?
                .ok_or(e),
            Err(e) => Err(e),
        }
    }

    /// All queues by position, with their person and film count.
    pub async fn list_queues(&self) -> Result<Vec<QueueOverview>> {
        let queues = self.queues.find_all().await?;
        let mut overviews = Vec::with_capacity(queues.len());
        for queue in queues {
            let person = match queue.kind.person_id() {
                Some(id) => self.persons.find_by_id(id).await?,
                None => None,
            };
            let film_count = self.queue_films.count_by_queue(queue.id).await?;
            overviews.push(QueueOverview {
                queue,
                person,
                film_count,
            });
        }
        Ok(overviews)
    }

    pub async fn get_queue(&self, id: QueueId) -> Result<Queue> {
        self.queues
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("queue {id}")))
    }

    /// Delete a queue and its memberships; later queues move up.
    pub async fn delete_queue(&self, id: QueueId) -> Result<bool> {
        let deleted = self.queues.delete_by_id(id).await?;
        if deleted {
            info!(queue_id = %id, "Deleted queue");
        }
        Ok(deleted)
    }

    pub async fn reorder_queues(&self, queue_ids: &[QueueId]) -> Result<()> {
        self.queues.reorder(queue_ids).await?;
        info!(count = queue_ids.len(), "Reordered queues");
        Ok(())
    }

    /// Delete a person together with their queue.
    pub async fn delete_person(&self, person_id: PersonId) -> Result<bool> {
        let deleted = self.persons.delete_by_id(person_id).await?;
        if deleted {
            info!(person_id = person_id, "Deleted person");
        }
        Ok(deleted)
    }

    /// A person's credits, newest first, one entry per title.
    pub async fn filmography(&self, person_id: PersonId) -> Result<Vec<FilmographyEntry>> {
        let credits = self
            .provider
            .get_person_credits(person_id)
            .await
            .map_err(|e| Error::provider(format!("credits for person {person_id}: {e:#}")))?;

        let queued: HashSet<FilmId> = match self.queues.find_for_person(person_id).await? {
            Some(queue) => self
                .queue_films
                .find_by_queue(queue.id)
                .await?
                .into_iter()
                .map(|entry| entry.film.id)
                .collect(),
            None => HashSet::new(),
        };

        Ok(dedup_credits(credits)
            .into_iter()
            .map(|credit| FilmographyEntry {
                in_queue: queued.contains(&credit.id),
                credit,
            })
            .collect())
    }
}

fn person_from_details(details: PersonDetails) -> Person {
    Person {
        id: details.id,
        name: details.name,
        department: details
            .known_for_department
            .as_deref()
            .map(Department::from_label)
            .unwrap_or_default(),
        image_path: details.profile_path.as_deref().map(image_url),
    }
}

/// Keep the first credit per title and sort newest first. Undated credits go
/// last.
fn dedup_credits(credits: Vec<Credit>) -> Vec<Credit> {
    let mut seen = HashSet::new();
    let mut unique: Vec<Credit> = credits
        .into_iter()
        .filter(|c| seen.insert((c.id, c.is_tv)))
        .collect();
    unique.sort_by(|a, b| b.release_date.cmp(&a.release_date));
    unique
}
