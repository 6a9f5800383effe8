//! Event Entity

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::choices::{DeliveryType, EventStatus, EventType};
use crate::domain::social::SocialMediaLink;
use crate::domain::validation;
use crate::error::{PlatformError, Result};

pub const MAX_TITLE_LENGTH: usize = 255;
pub const MAX_LOCATION_LENGTH: usize = 255;
pub const MAX_PLACE_LENGTH: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: String,

    pub title: String,
    pub description: String,

    pub event_start_date: NaiveDate,
    pub event_start_time: NaiveTime,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_end_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_end_time: Option<NaiveTime>,

    #[serde(default)]
    pub city: String,

    #[serde(default)]
    pub country: String,

    pub location: String,

    /// Maximum number of confirmed participants; `None` or 0 means unlimited
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,

    pub delivery_type: DeliveryType,
    pub status: EventStatus,
    pub event_type: EventType,

    /// Topic ids
    #[serde(default)]
    pub topics: Vec<String>,

    pub company_id: String,
    pub organizer_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    pub slug: String,

    #[serde(default)]
    pub social_media: Vec<SocialMediaLink>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Scheduling fields, kept together because they are validated together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_date: Option<NaiveDate>,
    pub end_time: Option<NaiveTime>,
}

impl Schedule {
    pub fn starts_at(&self) -> DateTime<Utc> {
        self.start_date.and_time(self.start_time).and_utc()
    }

    /// End date may not precede start date; the start may not be in the past
    pub fn validate(&self, now: DateTime<Utc>) -> Result<()> {
        if let Some(end_date) = self.end_date {
            if end_date < self.start_date {
                return Err(PlatformError::invalid_field(
                    "event_end_date",
                    "The event cannot end before it starts.",
                ));
            }
        }
        if self.starts_at() < now {
            return Err(PlatformError::validation("The event cannot start in the past."));
        }
        Ok(())
    }
}

impl Event {
    pub fn schedule(&self) -> Schedule {
        Schedule {
            start_date: self.event_start_date,
            start_time: self.event_start_time,
            end_date: self.event_end_date,
            end_time: self.event_end_time,
        }
    }

    pub fn set_schedule(&mut self, schedule: Schedule) {
        self.event_start_date = schedule.start_date;
        self.event_start_time = schedule.start_time;
        self.event_end_date = schedule.end_date;
        self.event_end_time = schedule.end_time;
    }

    /// Validate the plain fields; schedule rules live in [`Schedule::validate`]
    pub fn validate_fields(&self) -> Result<()> {
        validation::require_non_blank("title", &self.title)?;
        validation::require_max_len("title", &self.title, MAX_TITLE_LENGTH)?;
        validation::require_non_blank("description", &self.description)?;
        validation::require_non_blank("location", &self.location)?;
        validation::require_max_len("location", &self.location, MAX_LOCATION_LENGTH)?;
        validation::require_max_len("city", &self.city, MAX_PLACE_LENGTH)?;
        validation::require_max_len("country", &self.country, MAX_PLACE_LENGTH)?;
        Ok(())
    }

    /// Capacity limit, if the event has one
    pub fn capacity_limit(&self) -> Option<u32> {
        self.capacity.filter(|c| *c > 0)
    }

    /// Remaining spots given the number of confirmed registrations.
    /// `None` means unlimited. Negative when over-confirmed.
    pub fn available_capacity(&self, confirmed: u64) -> Option<i64> {
        self.capacity_limit()
            .map(|limit| i64::from(limit) - i64::try_from(confirmed).unwrap_or(i64::MAX))
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.event_end_date {
            Some(end) => write!(f, "{} ({} - {})", self.title, self.event_start_date, end),
            None => write!(f, "{} ({})", self.title, self.event_start_date),
        }
    }
}
