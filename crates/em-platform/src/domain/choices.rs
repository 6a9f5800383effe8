//! Fixed enumerations shared by the domain entities.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role a user holds by virtue of an attached profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Organizer,
    Participant,
}

impl UserRole {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Organizer => "Event Organizer",
            Self::Participant => "Participant",
        }
    }
}

/// Lifecycle status of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "UPCOMING",
            Self::Ongoing => "ONGOING",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

/// Status of a participant's registration for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationStatus {
    #[default]
    Pending,
    Confirmed,
    Rejected,
    Cancelled,
    Waitlist,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Rejected => "REJECTED",
            Self::Cancelled => "CANCELLED",
            Self::Waitlist => "WAITLIST",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryType {
    Online,
    Offline,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Meeting,
    Conference,
    Workshop,
    Seminar,
    Webinar,
    Training,
    Expo,
    Festival,
    PanelDiscussion,
    NetworkingEvent,
    ProductLaunch,
    VirtualConference,
    #[serde(rename = "Q_A_SESSION")]
    QASession,
    Hackathon,
    Meetup,
    Convention,
    Symposium,
    Retreat,
    Gala,
    Other,
}

/// Fixed set of topic categories; every topic is exactly one of these
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TopicCategory {
    Technology,
    Science,
    Business,
    Education,
    Health,
    Art,
    Entertainment,
    Sports,
    Environment,
    Finance,
    Marketing,
    Law,
    Politics,
    Culture,
    Lifestyle,
    Travel,
    Food,
    Music,
    Design,
    SocialImpact,
    Philanthropy,
    PersonalDevelopment,
    Other,
}

impl TopicCategory {
    pub const ALL: [TopicCategory; 23] = [
        Self::Technology,
        Self::Science,
        Self::Business,
        Self::Education,
        Self::Health,
        Self::Art,
        Self::Entertainment,
        Self::Sports,
        Self::Environment,
        Self::Finance,
        Self::Marketing,
        Self::Law,
        Self::Politics,
        Self::Culture,
        Self::Lifestyle,
        Self::Travel,
        Self::Food,
        Self::Music,
        Self::Design,
        Self::SocialImpact,
        Self::Philanthropy,
        Self::PersonalDevelopment,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technology => "TECHNOLOGY",
            Self::Science => "SCIENCE",
            Self::Business => "BUSINESS",
            Self::Education => "EDUCATION",
            Self::Health => "HEALTH",
            Self::Art => "ART",
            Self::Entertainment => "ENTERTAINMENT",
            Self::Sports => "SPORTS",
            Self::Environment => "ENVIRONMENT",
            Self::Finance => "FINANCE",
            Self::Marketing => "MARKETING",
            Self::Law => "LAW",
            Self::Politics => "POLITICS",
            Self::Culture => "CULTURE",
            Self::Lifestyle => "LIFESTYLE",
            Self::Travel => "TRAVEL",
            Self::Food => "FOOD",
            Self::Music => "MUSIC",
            Self::Design => "DESIGN",
            Self::SocialImpact => "SOCIAL_IMPACT",
            Self::Philanthropy => "PHILANTHROPY",
            Self::PersonalDevelopment => "PERSONAL_DEVELOPMENT",
            Self::Other => "OTHER",
        }
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            Self::Technology => "Technology",
            Self::Science => "Science",
            Self::Business => "Business",
            Self::Education => "Education",
            Self::Health => "Health",
            Self::Art => "Art",
            Self::Entertainment => "Entertainment",
            Self::Sports => "Sports",
            Self::Environment => "Environment",
            Self::Finance => "Finance",
            Self::Marketing => "Marketing",
            Self::Law => "Law",
            Self::Politics => "Politics",
            Self::Culture => "Culture",
            Self::Lifestyle => "Lifestyle",
            Self::Travel => "Travel",
            Self::Food => "Food",
            Self::Music => "Music",
            Self::Design => "Design",
            Self::SocialImpact => "Social Impact",
            Self::Philanthropy => "Philanthropy",
            Self::PersonalDevelopment => "Personal Development",
            Self::Other => "Other",
        }
    }
}

/// Social network a link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Telegram,
    Facebook,
    Twitter,
    Instagram,
    #[serde(rename = "linkedin")]
    LinkedIn,
    #[serde(rename = "youtube")]
    YouTube,
    #[serde(rename = "tiktok")]
    TikTok,
    #[default]
    Other,
}

impl SocialPlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Telegram => "telegram",
            Self::Facebook => "facebook",
            Self::Twitter => "twitter",
            Self::Instagram => "instagram",
            Self::LinkedIn => "linkedin",
            Self::YouTube => "youtube",
            Self::TikTok => "tiktok",
            Self::Other => "other",
        }
    }
}
