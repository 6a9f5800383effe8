//! Repository Layer
//!
//! Storage traits for all domain entities, with a MongoDB implementation for
//! deployments and an in-memory one for tests and local runs.

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{
    Company, Event, EventRegistration, EventStatus, Organizer, Participant, RegistrationStatus,
    Topic, TopicCategory, User,
};
use crate::error::Result;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &User) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn exists_by_email(&self, email: &str) -> Result<bool>;
    async fn exists_by_phone(&self, phone: &str) -> Result<bool>;
    async fn update(&self, user: &User) -> Result<()>;
}

#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    async fn insert(&self, participant: &Participant) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Participant>>;
    async fn find_by_user(&self, user_id: &str) -> Result<Option<Participant>>;
}

#[async_trait]
pub trait OrganizerRepository: Send + Sync {
    async fn insert(&self, organizer: &Organizer) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Organizer>>;
    async fn find_by_user(&self, user_id: &str) -> Result<Option<Organizer>>;
}

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn insert(&self, company: &Company) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Company>>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Company>>;
    async fn find_all(&self) -> Result<Vec<Company>>;
    async fn exists_by_slug(&self, slug: &str) -> Result<bool>;
    async fn update(&self, company: &Company) -> Result<()>;
    async fn delete(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait TopicRepository: Send + Sync {
    async fn insert(&self, topic: &Topic) -> Result<()>;
    async fn find_all(&self) -> Result<Vec<Topic>>;
    async fn find_by_name(&self, name: TopicCategory) -> Result<Option<Topic>>;
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Topic>>;
}

/// Optional filters for event listings
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub company_id: Option<String>,
    pub organizer_id: Option<String>,
    pub topic_id: Option<String>,
    pub status: Option<EventStatus>,
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn insert(&self, event: &Event) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>>;
    /// Ordered by start date descending, then start time ascending
    async fn find(&self, filter: &EventFilter) -> Result<Vec<Event>>;
    async fn exists_by_slug(&self, slug: &str) -> Result<bool>;
    async fn update(&self, event: &Event) -> Result<()>;
    async fn delete(&self, id: &str) -> Result<bool>;
}

/// Optional filters for registration listings
#[derive(Debug, Clone, Default)]
pub struct RegistrationFilter {
    pub participant_id: Option<String>,
    /// Registrations belonging to any of these events
    pub event_ids: Option<Vec<String>>,
    pub status: Option<RegistrationStatus>,
}

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    async fn insert(&self, registration: &EventRegistration) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<EventRegistration>>;
    async fn find(&self, filter: &RegistrationFilter) -> Result<Vec<EventRegistration>>;
    async fn exists_for(&self, participant_id: &str, event_id: &str) -> Result<bool>;
    async fn count_by_status(&self, event_id: &str, status: RegistrationStatus) -> Result<u64>;
    async fn update(&self, registration: &EventRegistration) -> Result<()>;
    async fn delete_by_event(&self, event_id: &str) -> Result<u64>;
}

/// All repositories, shared by the services
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub participants: Arc<dyn ParticipantRepository>,
    pub organizers: Arc<dyn OrganizerRepository>,
    pub companies: Arc<dyn CompanyRepository>,
    pub topics: Arc<dyn TopicRepository>,
    pub events: Arc<dyn EventRepository>,
    pub registrations: Arc<dyn RegistrationRepository>,
}

impl Repositories {
    pub fn mongo(db: &mongodb::Database) -> Self {
        Self {
            users: Arc::new(mongo::MongoUserRepository::new(db)),
            participants: Arc::new(mongo::MongoParticipantRepository::new(db)),
            organizers: Arc::new(mongo::MongoOrganizerRepository::new(db)),
            companies: Arc::new(mongo::MongoCompanyRepository::new(db)),
            topics: Arc::new(mongo::MongoTopicRepository::new(db)),
            events: Arc::new(mongo::MongoEventRepository::new(db)),
            registrations: Arc::new(mongo::MongoRegistrationRepository::new(db)),
        }
    }

    pub fn in_memory() -> Self {
        let store = memory::MemoryStore::new();
        Self {
            users: Arc::new(store.clone()),
            participants: Arc::new(store.clone()),
            organizers: Arc::new(store.clone()),
            companies: Arc::new(store.clone()),
            topics: Arc::new(store.clone()),
            events: Arc::new(store.clone()),
            registrations: Arc::new(store),
        }
    }
}
