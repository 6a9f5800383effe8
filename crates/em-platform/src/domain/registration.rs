//! Event Registration Entity
//!
//! Links a participant to an event. The admission rules that decide between
//! the requested status and WAITLIST live here so they can be exercised
//! without storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::choices::RegistrationStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRegistration {
    #[serde(rename = "_id")]
    pub id: String,

    pub participant_id: String,
    pub event_id: String,

    #[serde(default)]
    pub status: RegistrationStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventRegistration {
    pub fn new(participant_id: impl Into<String>, event_id: impl Into<String>, status: RegistrationStatus) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            participant_id: participant_id.into(),
            event_id: event_id.into(),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_status(&mut self, status: RegistrationStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

/// Status a new registration is stored with.
///
/// `available` is the event's remaining capacity (`None` = unlimited). With
/// no spot left the registration goes to the waitlist whatever was requested.
pub fn admit(available: Option<i64>, requested: RegistrationStatus) -> RegistrationStatus {
    match available {
        Some(spots) if spots <= 0 => RegistrationStatus::Waitlist,
        _ => requested,
    }
}

/// Status an existing registration is stored with after an update.
///
/// Only a move into CONFIRMED consumes a spot, so only that transition is
/// checked against capacity.
pub fn readmit(
    available: Option<i64>,
    current: RegistrationStatus,
    requested: RegistrationStatus,
) -> RegistrationStatus {
    if requested == RegistrationStatus::Confirmed && current != RegistrationStatus::Confirmed {
        admit(available, requested)
    } else {
        requested
    }
}
