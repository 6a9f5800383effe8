//! In-memory repositories
//!
//! One shared store implementing every repository trait. Uniqueness rules
//! match the MongoDB unique indexes so services behave the same on both.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{
    Company, Event, EventRegistration, Organizer, Participant, RegistrationStatus, Topic,
    TopicCategory, User,
};
use crate::error::{PlatformError, Result};
use crate::repository::{
    CompanyRepository, EventFilter, EventRepository, OrganizerRepository, ParticipantRepository,
    RegistrationFilter, RegistrationRepository, TopicRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<String, User>,
    participants: HashMap<String, Participant>,
    organizers: HashMap<String, Organizer>,
    companies: HashMap<String, Company>,
    topics: HashMap<String, Topic>,
    events: HashMap<String, Event>,
    registrations: HashMap<String, EventRegistration>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sort_events(events: &mut [Event]) {
    events.sort_by(|a, b| {
        b.event_start_date
            .cmp(&a.event_start_date)
            .then(a.event_start_time.cmp(&b.event_start_time))
    });
}

fn event_matches(event: &Event, filter: &EventFilter) -> bool {
    filter.company_id.as_ref().map_or(true, |id| &event.company_id == id)
        && filter.organizer_id.as_ref().map_or(true, |id| &event.organizer_id == id)
        && filter.topic_id.as_ref().map_or(true, |id| event.topics.contains(id))
        && filter.status.map_or(true, |status| event.status == status)
}

fn registration_matches(registration: &EventRegistration, filter: &RegistrationFilter) -> bool {
    filter
        .participant_id
        .as_ref()
        .map_or(true, |id| &registration.participant_id == id)
        && filter
            .event_ids
            .as_ref()
            .map_or(true, |ids| ids.contains(&registration.event_id))
        && filter.status.map_or(true, |status| registration.status == status)
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &User) -> Result<()> {
        let mut tables = self.tables.write();
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(PlatformError::duplicate("User", "email", &user.email));
        }
        if tables.users.values().any(|u| u.phone == user.phone) {
            return Err(PlatformError::duplicate("User", "phone", &user.phone));
        }
        tables.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.tables.read().users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.tables.read().users.values().find(|u| u.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        Ok(self.tables.read().users.values().any(|u| u.email == email))
    }

    async fn exists_by_phone(&self, phone: &str) -> Result<bool> {
        Ok(self.tables.read().users.values().any(|u| u.phone == phone))
    }

    async fn update(&self, user: &User) -> Result<()> {
        let mut tables = self.tables.write();
        if tables
            .users
            .values()
            .any(|u| u.id != user.id && (u.email == user.email || u.phone == user.phone))
        {
            return Err(PlatformError::duplicate("User", "email", &user.email));
        }
        tables.users.insert(user.id.clone(), user.clone());
        Ok(())
    }
}

#[async_trait]
impl ParticipantRepository for MemoryStore {
    async fn insert(&self, participant: &Participant) -> Result<()> {
        let mut tables = self.tables.write();
        if tables.participants.values().any(|p| p.user_id == participant.user_id) {
            return Err(PlatformError::duplicate("Participant", "user_id", &participant.user_id));
        }
        tables.participants.insert(participant.id.clone(), participant.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Participant>> {
        Ok(self.tables.read().participants.get(id).cloned())
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Option<Participant>> {
        Ok(self
            .tables
            .read()
            .participants
            .values()
            .find(|p| p.user_id == user_id)
            .cloned())
    }
}

#[async_trait]
impl OrganizerRepository for MemoryStore {
    async fn insert(&self, organizer: &Organizer) -> Result<()> {
        let mut tables = self.tables.write();
        if tables.organizers.values().any(|o| o.user_id == organizer.user_id) {
            return Err(PlatformError::duplicate("Organizer", "user_id", &organizer.user_id));
        }
        tables.organizers.insert(organizer.id.clone(), organizer.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Organizer>> {
        Ok(self.tables.read().organizers.get(id).cloned())
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Option<Organizer>> {
        Ok(self
            .tables
            .read()
            .organizers
            .values()
            .find(|o| o.user_id == user_id)
            .cloned())
    }
}

#[async_trait]
impl CompanyRepository for MemoryStore {
    async fn insert(&self, company: &Company) -> Result<()> {
        let mut tables = self.tables.write();
        if tables.companies.values().any(|c| c.slug == company.slug) {
            return Err(PlatformError::duplicate("Company", "slug", &company.slug));
        }
        tables.companies.insert(company.id.clone(), company.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Company>> {
        Ok(self.tables.read().companies.get(id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Company>> {
        Ok(self
            .tables
            .read()
            .companies
            .values()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Company>> {
        let mut companies: Vec<Company> = self.tables.read().companies.values().cloned().collect();
        companies.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(companies)
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool> {
        Ok(self.tables.read().companies.values().any(|c| c.slug == slug))
    }

    async fn update(&self, company: &Company) -> Result<()> {
        self.tables
            .write()
            .companies
            .insert(company.id.clone(), company.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.tables.write().companies.remove(id).is_some())
    }
}

#[async_trait]
impl TopicRepository for MemoryStore {
    async fn insert(&self, topic: &Topic) -> Result<()> {
        let mut tables = self.tables.write();
        if tables.topics.values().any(|t| t.name == topic.name) {
            return Err(PlatformError::duplicate("Topic", "name", topic.name.as_str()));
        }
        tables.topics.insert(topic.id.clone(), topic.clone());
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Topic>> {
        let mut topics: Vec<Topic> = self.tables.read().topics.values().cloned().collect();
        topics.sort_by_key(|t| t.name.as_str());
        Ok(topics)
    }

    async fn find_by_name(&self, name: TopicCategory) -> Result<Option<Topic>> {
        Ok(self
            .tables
            .read()
            .topics
            .values()
            .find(|t| t.name == name)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Topic>> {
        let tables = self.tables.read();
        Ok(ids.iter().filter_map(|id| tables.topics.get(id).cloned()).collect())
    }
}

#[async_trait]
impl EventRepository for MemoryStore {
    async fn insert(&self, event: &Event) -> Result<()> {
        let mut tables = self.tables.write();
        if tables.events.values().any(|e| e.slug == event.slug) {
            return Err(PlatformError::duplicate("Event", "slug", &event.slug));
        }
        tables.events.insert(event.id.clone(), event.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>> {
        Ok(self.tables.read().events.get(id).cloned())
    }

    async fn find(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self
            .tables
            .read()
            .events
            .values()
            .filter(|e| event_matches(e, filter))
            .cloned()
            .collect();
        sort_events(&mut events);
        Ok(events)
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool> {
        Ok(self.tables.read().events.values().any(|e| e.slug == slug))
    }

    async fn update(&self, event: &Event) -> Result<()> {
        self.tables.write().events.insert(event.id.clone(), event.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.tables.write().events.remove(id).is_some())
    }
}

#[async_trait]
impl RegistrationRepository for MemoryStore {
    async fn insert(&self, registration: &EventRegistration) -> Result<()> {
        let mut tables = self.tables.write();
        if tables.registrations.values().any(|r| {
            r.participant_id == registration.participant_id && r.event_id == registration.event_id
        }) {
            return Err(PlatformError::duplicate(
                "Event registration",
                "participant_id",
                &registration.participant_id,
            ));
        }
        tables
            .registrations
            .insert(registration.id.clone(), registration.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<EventRegistration>> {
        Ok(self.tables.read().registrations.get(id).cloned())
    }

    async fn find(&self, filter: &RegistrationFilter) -> Result<Vec<EventRegistration>> {
        let mut registrations: Vec<EventRegistration> = self
            .tables
            .read()
            .registrations
            .values()
            .filter(|r| registration_matches(r, filter))
            .cloned()
            .collect();
        registrations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(registrations)
    }

    async fn exists_for(&self, participant_id: &str, event_id: &str) -> Result<bool> {
        Ok(self
            .tables
            .read()
            .registrations
            .values()
            .any(|r| r.participant_id == participant_id && r.event_id == event_id))
    }

    async fn count_by_status(&self, event_id: &str, status: RegistrationStatus) -> Result<u64> {
        let count = self
            .tables
            .read()
            .registrations
            .values()
            .filter(|r| r.event_id == event_id && r.status == status)
            .count();
        Ok(count as u64)
    }

    async fn update(&self, registration: &EventRegistration) -> Result<()> {
        self.tables
            .write()
            .registrations
            .insert(registration.id.clone(), registration.clone());
        Ok(())
    }

    async fn delete_by_event(&self, event_id: &str) -> Result<u64> {
        let mut tables = self.tables.write();
        let before = tables.registrations.len();
        tables.registrations.retain(|_, r| r.event_id != event_id);
        Ok((before - tables.registrations.len()) as u64)
    }
}
