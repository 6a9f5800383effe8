//! Startup data seeding
//!
//! Topics are a fixed catalog and are always ensured. In development mode a
//! superuser is created from the configured admin credentials.

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::PlatformConfig;
use crate::domain::{validation, Topic, TopicCategory, User};
use crate::error::{PlatformError, Result};
use crate::repository::Repositories;
use crate::service::PasswordService;

pub struct DevDataSeeder {
    repos: Repositories,
    passwords: Arc<PasswordService>,
}

impl DevDataSeeder {
    pub fn new(repos: Repositories, passwords: Arc<PasswordService>) -> Self {
        Self { repos, passwords }
    }

    pub async fn seed(&self, config: &PlatformConfig) -> Result<()> {
        let created = self.seed_topics().await?;
        info!(created, total = TopicCategory::ALL.len(), "Topics seeded");

        if config.dev_mode {
            match (&config.admin_email, &config.admin_password) {
                (Some(email), Some(password)) => self.seed_superuser(email, password).await?,
                _ => warn!("EM_DEV_MODE is set but EM_ADMIN_EMAIL/EM_ADMIN_PASSWORD are not"),
            }
        }
        Ok(())
    }

    /// Insert every missing topic; returns how many were created
    pub async fn seed_topics(&self) -> Result<usize> {
        let mut created = 0;
        for name in TopicCategory::ALL {
            if self.repos.topics.find_by_name(name).await?.is_some() {
                continue;
            }
            match self.repos.topics.insert(&Topic::new(name)).await {
                Ok(()) => created += 1,
                // Another instance seeded it first
                Err(PlatformError::Duplicate { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(created)
    }

    async fn seed_superuser(&self, email: &str, password: &str) -> Result<()> {
        let email = validation::normalize_email(email);
        if self.repos.users.exists_by_email(&email).await? {
            return Ok(());
        }

        let hash = self.passwords.hash_password(password)?;
        // Phone is unique and required; the admin gets a placeholder
        let user = User::new(email.clone(), format!("admin:{}", email), hash).as_superuser();
        self.repos.users.insert(&user).await?;
        info!(user_id = %user.id, email = %email, "Development superuser created");
        Ok(())
    }
}
