//! User, Participant and Organizer repositories

use async_trait::async_trait;
use mongodb::{bson::doc, Collection, Database};

use super::map_write_error;
use crate::domain::{Organizer, Participant, User};
use crate::error::Result;
use crate::repository::{OrganizerRepository, ParticipantRepository, UserRepository};

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("users"),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, user: &User) -> Result<()> {
        self.collection
            .insert_one(user)
            .await
            .map_err(|e| map_write_error(e, "User", &[("email", user.email.as_str()), ("phone", user.phone.as_str())]))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let count = self.collection.count_documents(doc! { "email": email }).await?;
        Ok(count > 0)
    }

    async fn exists_by_phone(&self, phone: &str) -> Result<bool> {
        let count = self.collection.count_documents(doc! { "phone": phone }).await?;
        Ok(count > 0)
    }

    async fn update(&self, user: &User) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": &user.id }, user)
            .await
            .map_err(|e| map_write_error(e, "User", &[("email", user.email.as_str()), ("phone", user.phone.as_str())]))?;
        Ok(())
    }
}

pub struct MongoParticipantRepository {
    collection: Collection<Participant>,
}

impl MongoParticipantRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("participants"),
        }
    }
}

#[async_trait]
impl ParticipantRepository for MongoParticipantRepository {
    async fn insert(&self, participant: &Participant) -> Result<()> {
        self.collection
            .insert_one(participant)
            .await
            .map_err(|e| map_write_error(e, "Participant", &[("user_id", participant.user_id.as_str())]))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Participant>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Option<Participant>> {
        Ok(self.collection.find_one(doc! { "user_id": user_id }).await?)
    }
}

pub struct MongoOrganizerRepository {
    collection: Collection<Organizer>,
}

impl MongoOrganizerRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("organizers"),
        }
    }
}

#[async_trait]
impl OrganizerRepository for MongoOrganizerRepository {
    async fn insert(&self, organizer: &Organizer) -> Result<()> {
        self.collection
            .insert_one(organizer)
            .await
            .map_err(|e| map_write_error(e, "Organizer", &[("user_id", organizer.user_id.as_str())]))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Organizer>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Option<Organizer>> {
        Ok(self.collection.find_one(doc! { "user_id": user_id }).await?)
    }
}
