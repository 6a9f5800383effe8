//! User and Profile Entities
//!
//! A user is identified by email. Whether a user acts as a participant or an
//! organizer is decided by which profile document points at it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::choices::UserRole;
use crate::domain::social::SocialMediaLink;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,

    /// Login identifier, unique
    pub email: String,

    /// Unique phone number
    pub phone: String,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    /// Stored image path relative to the media root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    /// Argon2id PHC string
    pub password_hash: String,

    #[serde(default)]
    pub is_staff: bool,

    #[serde(default)]
    pub is_superuser: bool,

    pub is_active: bool,

    pub date_joined: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(email: impl Into<String>, phone: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.into(),
            phone: phone.into(),
            first_name: String::new(),
            last_name: String::new(),
            avatar: None,
            password_hash: password_hash.into(),
            is_staff: false,
            is_superuser: false,
            is_active: true,
            date_joined: Utc::now(),
            last_login: None,
        }
    }

    pub fn with_names(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    /// Promote to superuser; superusers are always staff
    pub fn as_superuser(mut self) -> Self {
        self.is_staff = true;
        self.is_superuser = true;
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    #[serde(rename = "_id")]
    pub id: String,

    pub user_id: String,

    /// Topic ids
    #[serde(default)]
    pub interests: Vec<String>,
}

impl Participant {
    pub const ROLE: UserRole = UserRole::Participant;

    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            interests: Vec::new(),
        }
    }

    pub fn with_interests(mut self, interests: Vec<String>) -> Self {
        self.interests = interests;
        self
    }
}

pub const MAX_BIO_LENGTH: usize = 500;
pub const MAX_PLACE_LENGTH: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organizer {
    #[serde(rename = "_id")]
    pub id: String,

    pub user_id: String,

    #[serde(default)]
    pub bio: String,

    #[serde(default)]
    pub city: String,

    #[serde(default)]
    pub country: String,

    #[serde(default)]
    pub social_media: Vec<SocialMediaLink>,
}

impl Organizer {
    pub const ROLE: UserRole = UserRole::Organizer;

    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            bio: String::new(),
            city: String::new(),
            country: String::new(),
            social_media: Vec::new(),
        }
    }
}
