//! Event Service
//!
//! Event lifecycle plus the derived capacity figures shown with every event.

use chrono::{NaiveDate, NaiveTime, Utc};
use std::collections::HashSet;
use tracing::info;

use crate::domain::social::{replace_by_platform, validate_links, SocialMediaLink};
use crate::domain::{
    slug, DeliveryType, Event, EventStatus, EventType, RegistrationStatus, Schedule,
};
use crate::error::{PlatformError, Result};
use crate::media::{MediaStore, EVENTS_DIR};
use crate::repository::{EventFilter, Repositories};
use crate::service::admission::AdmissionLocks;
use crate::service::authorization::{checks, AuthContext};

#[derive(Debug, Clone)]
pub struct EventInput {
    pub title: String,
    pub description: String,
    pub event_start_date: NaiveDate,
    pub event_start_time: NaiveTime,
    pub event_end_date: Option<NaiveDate>,
    pub event_end_time: Option<NaiveTime>,
    pub city: String,
    pub country: String,
    pub location: String,
    pub capacity: Option<u32>,
    pub delivery_type: DeliveryType,
    pub status: EventStatus,
    pub event_type: EventType,
    pub topics: Vec<String>,
    pub company_id: String,
    /// Required when staff create an event; organizers always own theirs
    pub organizer_id: Option<String>,
    pub social_media: Vec<SocialMediaLink>,
}

/// Field changes for an update; `None` leaves the field as it is.
/// The optional schedule fields use a nested option so they can be cleared.
#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_start_date: Option<NaiveDate>,
    pub event_start_time: Option<NaiveTime>,
    pub event_end_date: Option<Option<NaiveDate>>,
    pub event_end_time: Option<Option<NaiveTime>>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<Option<u32>>,
    pub delivery_type: Option<DeliveryType>,
    pub status: Option<EventStatus>,
    pub event_type: Option<EventType>,
    pub topics: Option<Vec<String>>,
    pub company_id: Option<String>,
    pub organizer_id: Option<String>,
    pub social_media: Option<Vec<SocialMediaLink>>,
}

impl From<EventInput> for EventChanges {
    fn from(input: EventInput) -> Self {
        Self {
            title: Some(input.title),
            description: Some(input.description),
            event_start_date: Some(input.event_start_date),
            event_start_time: Some(input.event_start_time),
            event_end_date: Some(input.event_end_date),
            event_end_time: Some(input.event_end_time),
            city: Some(input.city),
            country: Some(input.country),
            location: Some(input.location),
            capacity: Some(input.capacity),
            delivery_type: Some(input.delivery_type),
            status: Some(input.status),
            event_type: Some(input.event_type),
            topics: Some(input.topics),
            company_id: Some(input.company_id),
            organizer_id: input.organizer_id,
            social_media: Some(input.social_media),
        }
    }
}

/// An event with its derived registration figures
#[derive(Debug, Clone)]
pub struct EventView {
    pub event: Event,
    pub participants_count: u64,
    pub available_capacity: Option<i64>,
}

pub struct EventService {
    repos: Repositories,
    media: MediaStore,
    locks: AdmissionLocks,
}

impl EventService {
    pub fn new(repos: Repositories, media: MediaStore, locks: AdmissionLocks) -> Self {
        Self { repos, media, locks }
    }

    async fn view(&self, event: Event) -> Result<EventView> {
        let participants_count = self
            .repos
            .registrations
            .count_by_status(&event.id, RegistrationStatus::Confirmed)
            .await?;
        let available_capacity = event.available_capacity(participants_count);
        Ok(EventView {
            event,
            participants_count,
            available_capacity,
        })
    }

    async fn load(&self, id: &str) -> Result<Event> {
        self.repos
            .events
            .find_by_id(id)
            .await?
            .ok_or_else(|| PlatformError::not_found("Event", id))
    }

    pub async fn list(&self, filter: &EventFilter) -> Result<Vec<EventView>> {
        let events = self.repos.events.find(filter).await?;
        let mut views = Vec::with_capacity(events.len());
        for event in events {
            views.push(self.view(event).await?);
        }
        Ok(views)
    }

    pub async fn get(&self, id: &str) -> Result<EventView> {
        let event = self.load(id).await?;
        self.view(event).await
    }

    async fn ensure_company(&self, company_id: &str) -> Result<()> {
        if self.repos.companies.find_by_id(company_id).await?.is_none() {
            return Err(PlatformError::invalid_field(
                "company",
                format!("Invalid pk \"{}\" - object does not exist.", company_id),
            ));
        }
        Ok(())
    }

    async fn ensure_organizer(&self, organizer_id: &str) -> Result<()> {
        if self.repos.organizers.find_by_id(organizer_id).await?.is_none() {
            return Err(PlatformError::invalid_field(
                "organizer",
                format!("Invalid pk \"{}\" - object does not exist.", organizer_id),
            ));
        }
        Ok(())
    }

    /// Deduplicated topic ids, all of which must exist
    async fn resolve_topics(&self, topics: Vec<String>) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let topics: Vec<String> = topics.into_iter().filter(|id| seen.insert(id.clone())).collect();
        let found = self.repos.topics.find_by_ids(&topics).await?;
        if let Some(missing) = topics.iter().find(|id| !found.iter().any(|t| &t.id == *id)) {
            return Err(PlatformError::invalid_field(
                "topics",
                format!("Invalid pk \"{}\" - object does not exist.", missing),
            ));
        }
        Ok(topics)
    }

    /// Organizer a new or reassigned event belongs to
    fn owning_organizer(ctx: &AuthContext, requested: Option<String>) -> Result<String> {
        if !ctx.is_staff() {
            if let Some(own) = &ctx.organizer_id {
                return Ok(own.clone());
            }
        }
        requested
            .or_else(|| ctx.organizer_id.clone())
            .ok_or_else(|| PlatformError::invalid_field("organizer", "This field is required."))
    }

    pub async fn create(&self, ctx: &AuthContext, input: EventInput) -> Result<EventView> {
        checks::can_create_events(ctx)?;

        let organizer_id = Self::owning_organizer(ctx, input.organizer_id)?;
        self.ensure_organizer(&organizer_id).await?;
        self.ensure_company(&input.company_id).await?;
        let topics = self.resolve_topics(input.topics).await?;
        validate_links(&input.social_media)?;

        let now = Utc::now();
        let mut event = Event {
            id: uuid::Uuid::new_v4().to_string(),
            title: input.title.trim().to_string(),
            description: input.description,
            event_start_date: input.event_start_date,
            event_start_time: input.event_start_time,
            event_end_date: input.event_end_date,
            event_end_time: input.event_end_time,
            city: input.city,
            country: input.country,
            location: input.location,
            capacity: input.capacity,
            delivery_type: input.delivery_type,
            status: input.status,
            event_type: input.event_type,
            topics,
            company_id: input.company_id,
            organizer_id,
            image: None,
            slug: String::new(),
            social_media: input.social_media,
            created_at: now,
            updated_at: now,
        };
        event.validate_fields()?;
        event.schedule().validate(now)?;

        let base = slug::base_slug(&event.title, "event");
        for candidate in slug::candidates(&base) {
            if self.repos.events.exists_by_slug(&candidate).await? {
                continue;
            }
            event.slug = candidate;
            match self.repos.events.insert(&event).await {
                Ok(()) => {
                    info!(event_id = %event.id, slug = %event.slug, "Event created: {}", event);
                    return self.view(event).await;
                }
                Err(PlatformError::Duplicate { ref field, .. }) if field == "slug" => continue,
                Err(e) => return Err(e),
            }
        }
        Err(PlatformError::internal("Slug candidates exhausted"))
    }

    pub async fn update(&self, ctx: &AuthContext, id: &str, changes: EventChanges) -> Result<EventView> {
        let mut event = self.load(id).await?;
        checks::can_manage_event(ctx, &event.organizer_id)?;

        if let Some(title) = changes.title {
            event.title = title.trim().to_string();
        }
        if let Some(description) = changes.description {
            event.description = description;
        }
        if let Some(city) = changes.city {
            event.city = city;
        }
        if let Some(country) = changes.country {
            event.country = country;
        }
        if let Some(location) = changes.location {
            event.location = location;
        }
        if let Some(capacity) = changes.capacity {
            event.capacity = capacity;
        }
        if let Some(delivery_type) = changes.delivery_type {
            event.delivery_type = delivery_type;
        }
        if let Some(status) = changes.status {
            event.status = status;
        }
        if let Some(event_type) = changes.event_type {
            event.event_type = event_type;
        }
        if let Some(topics) = changes.topics {
            event.topics = self.resolve_topics(topics).await?;
        }
        if let Some(company_id) = changes.company_id {
            self.ensure_company(&company_id).await?;
            event.company_id = company_id;
        }
        if let Some(organizer_id) = changes.organizer_id {
            // Only staff may hand an event to another organizer
            if organizer_id != event.organizer_id {
                checks::require_staff(ctx)?;
                self.ensure_organizer(&organizer_id).await?;
                event.organizer_id = organizer_id;
            }
        }

        let current = event.schedule();
        let schedule = Schedule {
            start_date: changes.event_start_date.unwrap_or(current.start_date),
            start_time: changes.event_start_time.unwrap_or(current.start_time),
            end_date: changes.event_end_date.unwrap_or(current.end_date),
            end_time: changes.event_end_time.unwrap_or(current.end_time),
        };
        if schedule != current {
            schedule.validate(Utc::now())?;
            event.set_schedule(schedule);
        }
        event.validate_fields()?;

        if let Some(links) = changes.social_media {
            replace_by_platform(&mut event.social_media, links)?;
        }

        event.touch();
        self.repos.events.update(&event).await?;
        info!(event_id = %event.id, "Event updated");
        self.view(event).await
    }

    /// Delete an event and its registrations
    pub async fn delete(&self, ctx: &AuthContext, id: &str) -> Result<()> {
        let event = self.load(id).await?;
        checks::can_manage_event(ctx, &event.organizer_id)?;

        let removed = {
            let _guard = self.locks.acquire(&event.id).await;
            let removed = self.repos.registrations.delete_by_event(&event.id).await?;
            self.repos.events.delete(&event.id).await?;
            removed
        };
        if let Some(image) = &event.image {
            self.media.remove(image).await;
        }
        info!(event_id = %event.id, registrations = removed, "Event deleted");
        Ok(())
    }

    pub async fn update_image(
        &self,
        ctx: &AuthContext,
        id: &str,
        filename: &str,
        bytes: &[u8],
    ) -> Result<EventView> {
        let mut event = self.load(id).await?;
        checks::can_manage_event(ctx, &event.organizer_id)?;

        let path = self.media.save_image("event", filename, EVENTS_DIR, bytes).await?;
        if let Some(old) = event.image.replace(path) {
            self.media.remove(&old).await;
        }
        event.touch();
        self.repos.events.update(&event).await?;
        self.view(event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Company, EventRegistration, Organizer, Topic, TopicCategory};
    use chrono::Duration;
    use std::sync::Arc;

    struct Fixture {
        repos: Repositories,
        locks: AdmissionLocks,
        svc: Arc<EventService>,
        organizer: AuthContext,
        company_id: String,
        topic_id: String,
    }

    async fn fixture() -> Fixture {
        let repos = Repositories::in_memory();
        let organizer = Organizer::new("user-1");
        repos.organizers.insert(&organizer).await.unwrap();
        let company = Company::new("Acme", "Widgets");
        repos.companies.insert(&company).await.unwrap();
        let topic = Topic::new(TopicCategory::Technology);
        repos.topics.insert(&topic).await.unwrap();

        let locks = AdmissionLocks::default();
        Fixture {
            svc: Arc::new(EventService::new(
                repos.clone(),
                MediaStore::new(std::env::temp_dir()),
                locks.clone(),
            )),
            repos,
            locks,
            organizer: AuthContext {
                user_id: "user-1".to_string(),
                email: "org@example.com".to_string(),
                is_staff: false,
                is_superuser: false,
                participant_id: None,
                organizer_id: Some(organizer.id),
            },
            company_id: company.id,
            topic_id: topic.id,
        }
    }

    fn input(f: &Fixture, title: &str) -> EventInput {
        EventInput {
            title: title.to_string(),
            description: "Talks and pizza".to_string(),
            event_start_date: (Utc::now() + Duration::days(10)).date_naive(),
            event_start_time: NaiveTime::from_hms_opt(18, 30, 0).unwrap(),
            event_end_date: None,
            event_end_time: None,
            city: "Lisbon".to_string(),
            country: "Portugal".to_string(),
            location: "Hub".to_string(),
            capacity: Some(2),
            delivery_type: DeliveryType::Offline,
            status: EventStatus::Upcoming,
            event_type: EventType::Meetup,
            topics: vec![f.topic_id.clone(), f.topic_id.clone()],
            company_id: f.company_id.clone(),
            organizer_id: None,
            social_media: vec![],
        }
    }

    #[tokio::test]
    async fn test_organizer_owns_created_event() {
        let f = fixture().await;
        let mut req = input(&f, "Rust Night");
        req.organizer_id = Some("someone-else".to_string());
        let view = f.svc.create(&f.organizer, req).await.unwrap();
        assert_eq!(Some(view.event.organizer_id.clone()), f.organizer.organizer_id);
        assert_eq!(view.event.topics.len(), 1);
        assert_eq!(view.event.slug, "rust-night");
        assert_eq!(view.participants_count, 0);
        assert_eq!(view.available_capacity, Some(2));
    }

    #[tokio::test]
    async fn test_event_slugs_are_unique() {
        let f = fixture().await;
        let first = f.svc.create(&f.organizer, input(&f, "Title")).await.unwrap();
        let second = f.svc.create(&f.organizer, input(&f, "Title")).await.unwrap();
        assert_eq!(first.event.slug, "title");
        assert_eq!(second.event.slug, "title-1");
    }

    #[tokio::test]
    async fn test_staff_must_name_organizer() {
        let f = fixture().await;
        let staff = AuthContext {
            is_staff: true,
            organizer_id: None,
            ..f.organizer.clone()
        };
        let err = f.svc.create(&staff, input(&f, "Staff Event")).await.unwrap_err();
        assert!(matches!(err, PlatformError::InvalidField { ref field, .. } if field == "organizer"));
    }

    #[tokio::test]
    async fn test_rejects_past_start_and_unknown_company() {
        let f = fixture().await;
        let mut past = input(&f, "Old");
        past.event_start_date = NaiveDate::from_ymd_opt(2001, 1, 1).unwrap();
        assert!(f.svc.create(&f.organizer, past).await.is_err());

        let mut orphan = input(&f, "Orphan");
        orphan.company_id = "missing".to_string();
        let err = f.svc.create(&f.organizer, orphan).await.unwrap_err();
        assert!(matches!(err, PlatformError::InvalidField { ref field, .. } if field == "company"));
    }

    #[tokio::test]
    async fn test_other_organizer_cannot_update() {
        let f = fixture().await;
        let view = f.svc.create(&f.organizer, input(&f, "Mine")).await.unwrap();
        let stranger = AuthContext {
            organizer_id: Some("other-organizer".to_string()),
            ..f.organizer.clone()
        };
        let err = f
            .svc
            .update(&stranger, &view.event.id, EventChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_partial_update_keeps_schedule_and_slug() {
        let f = fixture().await;
        let view = f.svc.create(&f.organizer, input(&f, "Mine")).await.unwrap();
        let updated = f
            .svc
            .update(
                &f.organizer,
                &view.event.id,
                EventChanges {
                    title: Some("Renamed".to_string()),
                    capacity: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.event.title, "Renamed");
        assert_eq!(updated.event.slug, "mine");
        assert_eq!(updated.event.event_start_date, view.event.event_start_date);
        assert_eq!(updated.available_capacity, None);
    }

    #[tokio::test]
    async fn test_delete_waits_for_admission_and_removes_registrations() {
        let f = fixture().await;
        let view = f.svc.create(&f.organizer, input(&f, "Rust Night")).await.unwrap();
        let event_id = view.event.id.clone();

        let guard = f.locks.acquire(&event_id).await;
        let deleting = {
            let svc = f.svc.clone();
            let ctx = f.organizer.clone();
            let id = event_id.clone();
            tokio::spawn(async move { svc.delete(&ctx, &id).await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!deleting.is_finished());

        // Admitted while the delete was waiting
        let registration =
            EventRegistration::new("participant-1", &event_id, RegistrationStatus::Confirmed);
        f.repos.registrations.insert(&registration).await.unwrap();
        drop(guard);

        deleting.await.unwrap().unwrap();
        assert!(f.repos.events.find_by_id(&event_id).await.unwrap().is_none());
        assert!(f.repos.registrations.find_by_id(&registration.id).await.unwrap().is_none());
        assert!(f.locks.is_empty());
    }
}
