//! Event Registration Repository

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::FindOptions,
    Collection, Database,
};

use super::map_write_error;
use crate::domain::{EventRegistration, RegistrationStatus};
use crate::error::Result;
use crate::repository::{RegistrationFilter, RegistrationRepository};

pub struct MongoRegistrationRepository {
    collection: Collection<EventRegistration>,
}

impl MongoRegistrationRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("registrations"),
        }
    }
}

fn filter_document(filter: &RegistrationFilter) -> Document {
    let mut query = Document::new();
    if let Some(participant_id) = &filter.participant_id {
        query.insert("participant_id", participant_id);
    }
    if let Some(event_ids) = &filter.event_ids {
        query.insert("event_id", doc! { "$in": event_ids });
    }
    if let Some(status) = filter.status {
        query.insert("status", status.as_str());
    }
    query
}

#[async_trait]
impl RegistrationRepository for MongoRegistrationRepository {
    async fn insert(&self, registration: &EventRegistration) -> Result<()> {
        self.collection
            .insert_one(registration)
            .await
            .map_err(|e| {
                map_write_error(
                    e,
                    "Event registration",
                    &[("participant_id", registration.participant_id.as_str())],
                )
            })?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<EventRegistration>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find(&self, filter: &RegistrationFilter) -> Result<Vec<EventRegistration>> {
        let options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();
        let cursor = self
            .collection
            .find(filter_document(filter))
            .with_options(options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn exists_for(&self, participant_id: &str, event_id: &str) -> Result<bool> {
        let count = self
            .collection
            .count_documents(doc! { "participant_id": participant_id, "event_id": event_id })
            .await?;
        Ok(count > 0)
    }

    async fn count_by_status(&self, event_id: &str, status: RegistrationStatus) -> Result<u64> {
        Ok(self
            .collection
            .count_documents(doc! { "event_id": event_id, "status": status.as_str() })
            .await?)
    }

    async fn update(&self, registration: &EventRegistration) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": &registration.id }, registration)
            .await?;
        Ok(())
    }

    async fn delete_by_event(&self, event_id: &str) -> Result<u64> {
        let result = self.collection.delete_many(doc! { "event_id": event_id }).await?;
        Ok(result.deleted_count)
    }
}
