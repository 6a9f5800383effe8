//! Registration Service
//!
//! Admission of participants to events. Every decision that depends on the
//! number of confirmed registrations runs under a per-event lock, so the
//! count and the write that follows it cannot interleave with another
//! admission for the same event on this instance.

use tracing::{debug, info};

use crate::domain::{admit, readmit, Event, EventRegistration, RegistrationStatus};
use crate::error::{PlatformError, Result};
use crate::notification::{Notification, NotificationQueue};
use crate::repository::{EventFilter, RegistrationFilter, Repositories};
use crate::service::admission::AdmissionLocks;
use crate::service::authorization::{checks, AuthContext};

#[derive(Debug, Clone, Default)]
pub struct NewRegistration {
    pub event_id: String,
    /// Staff only; participants always register themselves
    pub participant_id: Option<String>,
    /// Staff only; participants always start as PENDING
    pub status: Option<RegistrationStatus>,
}

pub struct RegistrationService {
    repos: Repositories,
    notifications: NotificationQueue,
    locks: AdmissionLocks,
}

impl RegistrationService {
    pub fn new(repos: Repositories, notifications: NotificationQueue, locks: AdmissionLocks) -> Self {
        Self {
            repos,
            notifications,
            locks,
        }
    }

    /// Registrations visible to the caller: superusers see all, participants
    /// their own, organizers those of their events, anyone else nothing.
    pub async fn list(
        &self,
        ctx: &AuthContext,
        status: Option<RegistrationStatus>,
    ) -> Result<Vec<EventRegistration>> {
        let filter = if ctx.is_superuser() {
            RegistrationFilter {
                status,
                ..Default::default()
            }
        } else if let Some(participant_id) = &ctx.participant_id {
            RegistrationFilter {
                participant_id: Some(participant_id.clone()),
                status,
                ..Default::default()
            }
        } else if let Some(organizer_id) = &ctx.organizer_id {
            let events = self
                .repos
                .events
                .find(&EventFilter {
                    organizer_id: Some(organizer_id.clone()),
                    ..Default::default()
                })
                .await?;
            if events.is_empty() {
                return Ok(Vec::new());
            }
            RegistrationFilter {
                event_ids: Some(events.into_iter().map(|e| e.id).collect()),
                status,
                ..Default::default()
            }
        } else {
            return Ok(Vec::new());
        };
        self.repos.registrations.find(&filter).await
    }

    async fn load_event(&self, event_id: &str) -> Result<Event> {
        self.repos
            .events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| {
                PlatformError::invalid_field(
                    "event",
                    format!("Invalid pk \"{}\" - object does not exist.", event_id),
                )
            })
    }

    /// Remaining capacity of `event` right now; call with the event lock held
    async fn available_capacity(&self, event: &Event) -> Result<Option<i64>> {
        if event.capacity_limit().is_none() {
            return Ok(None);
        }
        let confirmed = self
            .repos
            .registrations
            .count_by_status(&event.id, RegistrationStatus::Confirmed)
            .await?;
        Ok(event.available_capacity(confirmed))
    }

    fn resolve_request(ctx: &AuthContext, req: &NewRegistration) -> Result<(String, RegistrationStatus)> {
        if ctx.is_staff() {
            let participant_id = req
                .participant_id
                .clone()
                .or_else(|| ctx.participant_id.clone())
                .ok_or_else(|| PlatformError::invalid_field("participant", "This field is required."))?;
            Ok((participant_id, req.status.unwrap_or_default()))
        } else {
            let participant_id = ctx
                .participant_id
                .clone()
                .ok_or_else(|| PlatformError::forbidden("Only participants can register for events."))?;
            Ok((participant_id, RegistrationStatus::Pending))
        }
    }

    pub async fn create(&self, ctx: &AuthContext, req: NewRegistration) -> Result<EventRegistration> {
        checks::can_register(ctx)?;
        let (participant_id, requested) = Self::resolve_request(ctx, &req)?;

        let participant = self
            .repos
            .participants
            .find_by_id(&participant_id)
            .await?
            .ok_or_else(|| {
                PlatformError::invalid_field(
                    "participant",
                    format!("Invalid pk \"{}\" - object does not exist.", participant_id),
                )
            })?;

        let (registration, event) = {
            let _guard = self.locks.acquire(&req.event_id).await;
            self.admit_locked(&participant.id, &req.event_id, requested).await?
        };

        info!(
            registration_id = %registration.id,
            event_id = %event.id,
            status = registration.status.as_str(),
            "Registration created"
        );
        self.notify_created(&registration, &participant.user_id, &event).await;
        Ok(registration)
    }

    /// Admission decision; call with the event lock held. The event is read
    /// here so a concurrent update or delete is always observed.
    async fn admit_locked(
        &self,
        participant_id: &str,
        event_id: &str,
        requested: RegistrationStatus,
    ) -> Result<(EventRegistration, Event)> {
        let event = self.load_event(event_id).await?;
        if self.repos.registrations.exists_for(participant_id, &event.id).await? {
            return Err(PlatformError::validation(
                "The participant is already registered for this event.",
            ));
        }
        let available = self.available_capacity(&event).await?;
        let status = admit(available, requested);
        if status != requested {
            debug!(event_id = %event.id, ?available, "Event is full, registration waitlisted");
        }

        let registration = EventRegistration::new(participant_id, &event.id, status);
        self.repos.registrations.insert(&registration).await?;
        Ok((registration, event))
    }

    /// Queue the confirmation email. Lookup failures only cost the email.
    async fn notify_created(&self, registration: &EventRegistration, user_id: &str, event: &Event) {
        let recipient = match self.repos.users.find_by_id(user_id).await {
            Ok(Some(user)) => user.email,
            _ => {
                debug!(registration_id = %registration.id, "No recipient for registration email");
                return;
            }
        };
        let organizer_name = self.organizer_name(&event.organizer_id).await.unwrap_or_default();

        self.notifications.enqueue(Notification::RegistrationCreated {
            to: recipient,
            registration_id: registration.id.clone(),
            status: registration.status,
            event_title: event.title.clone(),
            event_location: event.location.clone(),
            event_start_date: event.event_start_date,
            event_start_time: event.event_start_time,
            organizer_name,
            created_at: registration.created_at,
            updated_at: registration.updated_at,
        });
    }

    async fn organizer_name(&self, organizer_id: &str) -> Option<String> {
        let organizer = self.repos.organizers.find_by_id(organizer_id).await.ok()??;
        let user = self.repos.users.find_by_id(&organizer.user_id).await.ok()??;
        Some(user.full_name())
    }

    async fn find(&self, id: &str) -> Result<EventRegistration> {
        self.repos
            .registrations
            .find_by_id(id)
            .await?
            .ok_or_else(|| PlatformError::not_found("Event registration", id))
    }

    /// Status change; call with the event lock held. Registration and event
    /// are re-read so neither the current status nor the capacity is stale.
    async fn update_locked(
        &self,
        id: &str,
        requested: RegistrationStatus,
    ) -> Result<EventRegistration> {
        let mut registration = self.find(id).await?;
        let event = self.load_event(&registration.event_id).await?;
        let available = if requested == RegistrationStatus::Confirmed
            && registration.status != RegistrationStatus::Confirmed
        {
            self.available_capacity(&event).await?
        } else {
            None
        };
        let status = readmit(available, registration.status, requested);
        registration.set_status(status);
        self.repos.registrations.update(&registration).await?;
        Ok(registration)
    }

    /// Change a registration's status. Moving into CONFIRMED while the event
    /// is full stores WAITLIST instead.
    pub async fn update_status(
        &self,
        ctx: &AuthContext,
        id: &str,
        requested: RegistrationStatus,
    ) -> Result<EventRegistration> {
        checks::can_update_registrations(ctx)?;
        let registration = self.find(id).await?;
        let event = self.load_event(&registration.event_id).await?;
        checks::can_modify_registration(ctx, &event.organizer_id)?;

        let registration = {
            let _guard = self.locks.acquire(&event.id).await;
            self.update_locked(id, requested).await?
        };

        info!(
            registration_id = %registration.id,
            status = registration.status.as_str(),
            "Registration updated"
        );
        Ok(registration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use crate::domain::event::tests::sample_event;
    use crate::domain::{Organizer, Participant, User};

    struct Fixture {
        repos: Repositories,
        locks: AdmissionLocks,
        svc: Arc<RegistrationService>,
        event: Event,
        _receiver: tokio::sync::mpsc::UnboundedReceiver<Notification>,
    }

    async fn fixture(capacity: Option<u32>) -> Fixture {
        let repos = Repositories::in_memory();
        let organizer_user = User::new("org@example.com", "+10", "h").with_names("Grace", "Hopper");
        repos.users.insert(&organizer_user).await.unwrap();
        let organizer = Organizer::new(&organizer_user.id);
        repos.organizers.insert(&organizer).await.unwrap();

        let mut event = sample_event(capacity);
        event.organizer_id = organizer.id.clone();
        repos.events.insert(&event).await.unwrap();

        let (queue, receiver) = NotificationQueue::channel();
        let locks = AdmissionLocks::default();
        Fixture {
            svc: Arc::new(RegistrationService::new(repos.clone(), queue, locks.clone())),
            repos,
            locks,
            event,
            _receiver: receiver,
        }
    }

    async fn participant(repos: &Repositories, n: usize) -> AuthContext {
        let user = User::new(format!("p{}@example.com", n), format!("+2{}", n), "h");
        repos.users.insert(&user).await.unwrap();
        let participant = Participant::new(&user.id);
        repos.participants.insert(&participant).await.unwrap();
        AuthContext {
            user_id: user.id,
            email: user.email,
            is_staff: false,
            is_superuser: false,
            participant_id: Some(participant.id),
            organizer_id: None,
        }
    }

    fn staff() -> AuthContext {
        AuthContext {
            user_id: "staff".to_string(),
            email: "staff@example.com".to_string(),
            is_staff: true,
            is_superuser: true,
            participant_id: None,
            organizer_id: None,
        }
    }

    fn register(event: &Event) -> NewRegistration {
        NewRegistration {
            event_id: event.id.clone(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_participant_status_is_pending() {
        let f = fixture(Some(5)).await;
        let ctx = participant(&f.repos, 1).await;
        let mut req = register(&f.event);
        req.status = Some(RegistrationStatus::Confirmed);
        let registration = f.svc.create(&ctx, req).await.unwrap();
        assert_eq!(registration.status, RegistrationStatus::Pending);
    }

    #[tokio::test]
    async fn test_full_event_waitlists() {
        let f = fixture(Some(1)).await;
        let first = participant(&f.repos, 1).await;
        let second = participant(&f.repos, 2).await;

        let confirmed = f
            .svc
            .create(
                &staff(),
                NewRegistration {
                    event_id: f.event.id.clone(),
                    participant_id: first.participant_id.clone(),
                    status: Some(RegistrationStatus::Confirmed),
                },
            )
            .await
            .unwrap();
        assert_eq!(confirmed.status, RegistrationStatus::Confirmed);

        let waitlisted = f.svc.create(&second, register(&f.event)).await.unwrap();
        assert_eq!(waitlisted.status, RegistrationStatus::Waitlist);
    }

    #[tokio::test]
    async fn test_duplicate_registration_rejected() {
        let f = fixture(None).await;
        let ctx = participant(&f.repos, 1).await;
        f.svc.create(&ctx, register(&f.event)).await.unwrap();
        let err = f.svc.create(&ctx, register(&f.event)).await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_concurrent_confirmations_never_exceed_capacity() {
        let capacity = 3;
        let f = fixture(Some(capacity)).await;
        let mut participants = Vec::new();
        for n in 0..20 {
            participants.push(participant(&f.repos, n).await);
        }

        let mut handles = Vec::new();
        for ctx in participants {
            let svc = f.svc.clone();
            let event_id = f.event.id.clone();
            handles.push(tokio::spawn(async move {
                svc.create(
                    &staff(),
                    NewRegistration {
                        event_id,
                        participant_id: ctx.participant_id.clone(),
                        status: Some(RegistrationStatus::Confirmed),
                    },
                )
                .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let confirmed = f
            .repos
            .registrations
            .count_by_status(&f.event.id, RegistrationStatus::Confirmed)
            .await
            .unwrap();
        let waitlisted = f
            .repos
            .registrations
            .count_by_status(&f.event.id, RegistrationStatus::Waitlist)
            .await
            .unwrap();
        assert_eq!(confirmed, u64::from(capacity));
        assert_eq!(waitlisted, 17);
        assert!(f.svc.locks.is_empty());
    }

    #[tokio::test]
    async fn test_update_into_confirmed_respects_capacity() {
        let f = fixture(Some(1)).await;
        let a = participant(&f.repos, 1).await;
        let b = participant(&f.repos, 2).await;
        let first = f.svc.create(&a, register(&f.event)).await.unwrap();
        let second = f.svc.create(&b, register(&f.event)).await.unwrap();

        let confirmed = f
            .svc
            .update_status(&staff(), &first.id, RegistrationStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(confirmed.status, RegistrationStatus::Confirmed);

        let blocked = f
            .svc
            .update_status(&staff(), &second.id, RegistrationStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(blocked.status, RegistrationStatus::Waitlist);

        let cancelled = f
            .svc
            .update_status(&staff(), &first.id, RegistrationStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(cancelled.status, RegistrationStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_update_unknown_registration() {
        let f = fixture(None).await;
        let err = f
            .svc
            .update_status(&staff(), "missing", RegistrationStatus::Confirmed)
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_by_role() {
        let f = fixture(None).await;
        let a = participant(&f.repos, 1).await;
        let b = participant(&f.repos, 2).await;
        f.svc.create(&a, register(&f.event)).await.unwrap();
        f.svc.create(&b, register(&f.event)).await.unwrap();

        assert_eq!(f.svc.list(&a, None).await.unwrap().len(), 1);
        assert_eq!(f.svc.list(&staff(), None).await.unwrap().len(), 2);
        assert_eq!(
            f.svc
                .list(&staff(), Some(RegistrationStatus::Confirmed))
                .await
                .unwrap()
                .len(),
            0
        );

        let owner = AuthContext {
            organizer_id: Some(f.event.organizer_id.clone()),
            ..staff()
        };
        let owner = AuthContext {
            is_staff: false,
            is_superuser: false,
            ..owner
        };
        assert_eq!(f.svc.list(&owner, None).await.unwrap().len(), 2);

        let nobody = AuthContext {
            is_staff: false,
            is_superuser: false,
            ..staff()
        };
        assert!(f.svc.list(&nobody, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_admission_sees_event_removed_while_waiting() {
        let f = fixture(Some(5)).await;
        let ctx = participant(&f.repos, 1).await;

        // Hold the event the way a delete does, then remove it
        let guard = f.locks.acquire(&f.event.id).await;
        let pending = {
            let svc = f.svc.clone();
            let req = register(&f.event);
            tokio::spawn(async move { svc.create(&ctx, req).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!pending.is_finished());
        f.repos.registrations.delete_by_event(&f.event.id).await.unwrap();
        f.repos.events.delete(&f.event.id).await.unwrap();
        drop(guard);

        let err = pending.await.unwrap().unwrap_err();
        assert!(matches!(err, PlatformError::InvalidField { ref field, .. } if field == "event"));
        let orphans = f
            .repos
            .registrations
            .find(&RegistrationFilter::default())
            .await
            .unwrap();
        assert!(orphans.is_empty());
        assert!(f.locks.is_empty());
    }

    #[tokio::test]
    async fn test_admission_uses_capacity_changed_while_waiting() {
        let f = fixture(Some(5)).await;
        let first = participant(&f.repos, 1).await;
        f.svc
            .create(
                &staff(),
                NewRegistration {
                    event_id: f.event.id.clone(),
                    participant_id: first.participant_id.clone(),
                    status: Some(RegistrationStatus::Confirmed),
                },
            )
            .await
            .unwrap();

        let second = participant(&f.repos, 2).await;
        let guard = f.locks.acquire(&f.event.id).await;
        let pending = {
            let svc = f.svc.clone();
            let req = NewRegistration {
                event_id: f.event.id.clone(),
                participant_id: second.participant_id.clone(),
                status: Some(RegistrationStatus::Confirmed),
            };
            tokio::spawn(async move { svc.create(&staff(), req).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        let mut shrunk = f.event.clone();
        shrunk.capacity = Some(1);
        f.repos.events.update(&shrunk).await.unwrap();
        drop(guard);

        let registration = pending.await.unwrap().unwrap();
        assert_eq!(registration.status, RegistrationStatus::Waitlist);
    }
}
