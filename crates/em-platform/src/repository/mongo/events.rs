//! Event Repository

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::FindOptions,
    Collection, Database,
};

use super::map_write_error;
use crate::domain::Event;
use crate::error::Result;
use crate::repository::{EventFilter, EventRepository};

pub struct MongoEventRepository {
    collection: Collection<Event>,
}

impl MongoEventRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("events"),
        }
    }

    fn listing_options() -> FindOptions {
        FindOptions::builder()
            .sort(doc! { "event_start_date": -1, "event_start_time": 1 })
            .build()
    }
}

fn filter_document(filter: &EventFilter) -> Document {
    let mut query = Document::new();
    if let Some(company_id) = &filter.company_id {
        query.insert("company_id", company_id);
    }
    if let Some(organizer_id) = &filter.organizer_id {
        query.insert("organizer_id", organizer_id);
    }
    if let Some(topic_id) = &filter.topic_id {
        // Matches any element of the topics array
        query.insert("topics", topic_id);
    }
    if let Some(status) = filter.status {
        query.insert("status", status.as_str());
    }
    query
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    async fn insert(&self, event: &Event) -> Result<()> {
        self.collection
            .insert_one(event)
            .await
            .map_err(|e| map_write_error(e, "Event", &[("slug", event.slug.as_str())]))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        let cursor = self
            .collection
            .find(filter_document(filter))
            .with_options(Self::listing_options())
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool> {
        let count = self.collection.count_documents(doc! { "slug": slug }).await?;
        Ok(count > 0)
    }

    async fn update(&self, event: &Event) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": &event.id }, event)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
