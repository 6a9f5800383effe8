//! Company and Topic repositories

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::FindOptions, Collection, Database};

use super::map_write_error;
use crate::domain::{Company, Topic, TopicCategory};
use crate::error::Result;
use crate::repository::{CompanyRepository, TopicRepository};

pub struct MongoCompanyRepository {
    collection: Collection<Company>,
}

impl MongoCompanyRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("companies"),
        }
    }
}

#[async_trait]
impl CompanyRepository for MongoCompanyRepository {
    async fn insert(&self, company: &Company) -> Result<()> {
        self.collection
            .insert_one(company)
            .await
            .map_err(|e| map_write_error(e, "Company", &[("slug", company.slug.as_str())]))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Company>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Company>> {
        Ok(self.collection.find_one(doc! { "slug": slug }).await?)
    }

    async fn find_all(&self) -> Result<Vec<Company>> {
        let options = FindOptions::builder().sort(doc! { "name": 1 }).build();
        let cursor = self.collection.find(doc! {}).with_options(options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool> {
        let count = self.collection.count_documents(doc! { "slug": slug }).await?;
        Ok(count > 0)
    }

    async fn update(&self, company: &Company) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": &company.id }, company)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}

pub struct MongoTopicRepository {
    collection: Collection<Topic>,
}

impl MongoTopicRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("topics"),
        }
    }
}

#[async_trait]
impl TopicRepository for MongoTopicRepository {
    async fn insert(&self, topic: &Topic) -> Result<()> {
        self.collection
            .insert_one(topic)
            .await
            .map_err(|e| map_write_error(e, "Topic", &[("name", topic.name.as_str())]))?;
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Topic>> {
        let options = FindOptions::builder().sort(doc! { "name": 1 }).build();
        let cursor = self.collection.find(doc! {}).with_options(options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_name(&self, name: TopicCategory) -> Result<Option<Topic>> {
        Ok(self.collection.find_one(doc! { "name": name.as_str() }).await?)
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Topic>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self.collection.find(doc! { "_id": { "$in": ids } }).await?;
        Ok(cursor.try_collect().await?)
    }
}
