//! Account Service
//!
//! Sign-up, organizer onboarding, login, token refresh and avatar changes.

use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::social::{validate_links, SocialMediaLink};
use crate::domain::user::{MAX_BIO_LENGTH, MAX_PLACE_LENGTH};
use crate::domain::{validation, Organizer, Participant, User};
use crate::error::{PlatformError, Result};
use crate::media::{MediaStore, AVATARS_DIR};
use crate::notification::{Notification, NotificationQueue};
use crate::repository::Repositories;
use crate::service::auth::{AuthService, TokenPair};
use crate::service::password::PasswordService;

pub const MAX_PHONE_LENGTH: usize = 50;
pub const MAX_NAME_LENGTH: usize = 150;

/// Participant self-registration
#[derive(Debug, Clone, Default)]
pub struct SignUp {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub interests: Vec<String>,
}

/// Organizer account created by staff
#[derive(Debug, Clone, Default)]
pub struct NewOrganizer {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub bio: String,
    pub city: String,
    pub country: String,
    pub social_media: Vec<SocialMediaLink>,
}

/// A user together with whichever profiles point at it
#[derive(Debug, Clone)]
pub struct Profile {
    pub user: User,
    pub participant: Option<Participant>,
    pub organizer: Option<Organizer>,
}

pub struct AccountService {
    repos: Repositories,
    auth: Arc<AuthService>,
    passwords: Arc<PasswordService>,
    media: MediaStore,
    notifications: NotificationQueue,
}

impl AccountService {
    pub fn new(
        repos: Repositories,
        auth: Arc<AuthService>,
        passwords: Arc<PasswordService>,
        media: MediaStore,
        notifications: NotificationQueue,
    ) -> Self {
        Self {
            repos,
            auth,
            passwords,
            media,
            notifications,
        }
    }

    /// Identity checks shared by both account kinds; returns the normalized email
    async fn check_identity(&self, email: &str, phone: &str, first_name: &str, last_name: &str) -> Result<String> {
        let email = validation::normalize_email(email);
        validation::require_email("email", &email)?;
        validation::require_non_blank("phone", phone)?;
        validation::require_max_len("phone", phone, MAX_PHONE_LENGTH)?;
        validation::require_max_len("first_name", first_name, MAX_NAME_LENGTH)?;
        validation::require_max_len("last_name", last_name, MAX_NAME_LENGTH)?;

        if self.repos.users.exists_by_email(&email).await? {
            return Err(PlatformError::duplicate("User", "email", email));
        }
        if self.repos.users.exists_by_phone(phone).await? {
            return Err(PlatformError::duplicate("User", "phone", phone));
        }
        Ok(email)
    }

    /// Create a user with a participant profile and issue its first tokens
    pub async fn sign_up(&self, req: SignUp) -> Result<(Profile, TokenPair)> {
        let email = self
            .check_identity(&req.email, &req.phone, &req.first_name, &req.last_name)
            .await?;

        if req.password != req.confirm_password {
            return Err(PlatformError::invalid_field("password", "Passwords do not match."));
        }
        self.passwords.policy().validate(
            &req.password,
            &[email.as_str(), req.first_name.as_str(), req.last_name.as_str()],
        )?;

        let mut interests = req.interests;
        let mut seen = HashSet::new();
        interests.retain(|id| seen.insert(id.clone()));
        if !interests.is_empty() {
            let found = self.repos.topics.find_by_ids(&interests).await?;
            if let Some(missing) = interests.iter().find(|id| !found.iter().any(|t| &t.id == *id)) {
                return Err(PlatformError::invalid_field(
                    "interests",
                    format!("Invalid pk \"{}\" - object does not exist.", missing),
                ));
            }
        }

        let hash = self.passwords.hash_password(&req.password)?;
        let user = User::new(email, req.phone, hash).with_names(req.first_name, req.last_name);
        self.repos.users.insert(&user).await?;

        let participant = Participant::new(&user.id).with_interests(interests);
        self.repos.participants.insert(&participant).await?;

        let tokens = self.auth.generate_token_pair(&user)?;
        info!(user_id = %user.id, "Participant account created");

        Ok((
            Profile {
                user,
                participant: Some(participant),
                organizer: None,
            },
            tokens,
        ))
    }

    /// Create an organizer with a generated password and mail the credentials
    pub async fn create_organizer(&self, req: NewOrganizer) -> Result<Profile> {
        let email = self
            .check_identity(&req.email, &req.phone, &req.first_name, &req.last_name)
            .await?;
        validation::require_max_len("bio", &req.bio, MAX_BIO_LENGTH)?;
        validation::require_max_len("city", &req.city, MAX_PLACE_LENGTH)?;
        validation::require_max_len("country", &req.country, MAX_PLACE_LENGTH)?;
        validate_links(&req.social_media)?;

        let password = self.passwords.generate_password();
        let hash = self.passwords.hash_password(&password)?;
        let user = User::new(email, req.phone, hash).with_names(req.first_name, req.last_name);
        self.repos.users.insert(&user).await?;

        let organizer = Organizer {
            bio: req.bio,
            city: req.city,
            country: req.country,
            social_media: req.social_media,
            ..Organizer::new(&user.id)
        };
        self.repos.organizers.insert(&organizer).await?;

        self.notifications.enqueue(Notification::OrganizerCredentials {
            to: user.email.clone(),
            first_name: user.first_name.clone(),
            password,
        });
        info!(user_id = %user.id, organizer_id = %organizer.id, "Organizer account created");

        Ok(Profile {
            user,
            participant: None,
            organizer: Some(organizer),
        })
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(User, TokenPair)> {
        let email = validation::normalize_email(email);
        let mut user = self
            .repos
            .users
            .find_by_email(&email)
            .await?
            .ok_or(PlatformError::InvalidCredentials)?;

        if !self.passwords.verify_password(password, &user.password_hash)? {
            warn!(email = %email, "Login failed: wrong password");
            return Err(PlatformError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(PlatformError::unauthorized("No active account found with the given credentials"));
        }

        user.last_login = Some(Utc::now());
        self.repos.users.update(&user).await?;

        let tokens = self.auth.generate_token_pair(&user)?;
        info!(user_id = %user.id, "User logged in");
        Ok((user, tokens))
    }

    /// Exchange a refresh token for a fresh access token
    pub async fn refresh(&self, refresh_token: &str) -> Result<String> {
        let claims = self.auth.validate_refresh_token(refresh_token)?;
        let user = self
            .repos
            .users
            .find_by_id(&claims.sub)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| PlatformError::unauthorized("User not found"))?;
        self.auth.generate_access_token(&user)
    }

    pub async fn profile(&self, user_id: &str) -> Result<Profile> {
        let user = self
            .repos
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| PlatformError::not_found("User", user_id))?;
        let participant = self.repos.participants.find_by_user(user_id).await?;
        let organizer = self.repos.organizers.find_by_user(user_id).await?;
        Ok(Profile {
            user,
            participant,
            organizer,
        })
    }

    pub async fn update_avatar(&self, user_id: &str, filename: &str, bytes: &[u8]) -> Result<User> {
        let mut user = self
            .repos
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| PlatformError::not_found("User", user_id))?;

        let path = self.media.save_image("user", filename, AVATARS_DIR, bytes).await?;
        if let Some(old) = user.avatar.replace(path) {
            self.media.remove(&old).await;
        }
        self.repos.users.update(&user).await?;
        Ok(user)
    }
}
