//! Company and Topic Entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::choices::TopicCategory;
use crate::domain::social::SocialMediaLink;
use crate::domain::validation;
use crate::error::Result;

pub const MAX_COMPANY_NAME_LENGTH: usize = 50;
pub const MAX_WEBSITE_URL_LENGTH: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    pub description: String,

    #[serde(default)]
    pub website_url: String,

    /// Generated on creation, never changed afterwards
    pub slug: String,

    #[serde(default)]
    pub social_media: Vec<SocialMediaLink>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            website_url: String::new(),
            slug: String::new(),
            social_media: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_website(mut self, website_url: impl Into<String>) -> Self {
        self.website_url = website_url.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        validation::require_non_blank("name", &self.name)?;
        validation::require_max_len("name", &self.name, MAX_COMPANY_NAME_LENGTH)?;
        validation::require_non_blank("description", &self.description)?;
        if !self.website_url.is_empty() {
            validation::require_url("website_url", &self.website_url, MAX_WEBSITE_URL_LENGTH)?;
        }
        Ok(())
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Creation timestamp as shown to humans
    pub fn formatted_created_at(&self) -> String {
        self.created_at.format("%d.%m.%Y %H:%M").to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    #[serde(rename = "_id")]
    pub id: String,

    pub name: TopicCategory,
}

impl Topic {
    pub fn new(name: TopicCategory) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
        }
    }
}
