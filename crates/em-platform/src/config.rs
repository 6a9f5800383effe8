//! Platform configuration
//!
//! All settings come from `EM_*` environment variables.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `EM_API_PORT` | `8000` | HTTP API port |
//! | `EM_STORAGE` | `mongo` | `mongo` or `memory` |
//! | `EM_MONGO_URL` | `mongodb://localhost:27017` | MongoDB connection URL |
//! | `EM_MONGO_DB` | `events` | MongoDB database name |
//! | `EM_JWT_SECRET` | dev secret | HS256 signing secret |
//! | `EM_JWT_ISSUER` | `event-management` | JWT issuer claim |
//! | `EM_ACCESS_TOKEN_TTL_SECS` | `300` | Access token lifetime |
//! | `EM_REFRESH_TOKEN_TTL_SECS` | `86400` | Refresh token lifetime |
//! | `EM_MEDIA_ROOT` | `media` | Directory uploaded images are written to |
//! | `EM_SMTP_HOST` | - | SMTP relay; emails are only logged when unset |
//! | `EM_SMTP_PORT` | `587` | SMTP port |
//! | `EM_SMTP_USERNAME` / `EM_SMTP_PASSWORD` | - | SMTP credentials |
//! | `EM_EMAIL_FROM` | `noreply@events.local` | Sender address |
//! | `EM_DEV_MODE` | `false` | Enables the development superuser |
//! | `EM_ADMIN_EMAIL` / `EM_ADMIN_PASSWORD` | - | Development superuser credentials |

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::PlatformError;

const DEV_JWT_SECRET: &str = "dev-secret-change-me";

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

/// Storage backend for the repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Mongo,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(Self::Mongo),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(PlatformError::Configuration {
                message: format!("Unknown storage backend '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub api_port: u16,
    pub storage: StorageBackend,
    pub mongo_url: String,
    pub mongo_db: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
    pub media_root: PathBuf,
    pub smtp: Option<SmtpConfig>,
    pub email_from: String,
    pub dev_mode: bool,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            api_port: 8000,
            storage: StorageBackend::Mongo,
            mongo_url: "mongodb://localhost:27017".to_string(),
            mongo_db: "events".to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_issuer: "event-management".to_string(),
            access_token_ttl_secs: 300,
            refresh_token_ttl_secs: 86400,
            media_root: PathBuf::from("media"),
            smtp: None,
            email_from: "noreply@events.local".to_string(),
            dev_mode: false,
            admin_email: None,
            admin_password: None,
        }
    }
}

impl PlatformConfig {
    pub fn from_env() -> Result<Self, PlatformError> {
        let defaults = Self::default();

        let storage = env_or("EM_STORAGE", "mongo").parse()?;
        let smtp = env_opt("EM_SMTP_HOST").map(|host| SmtpConfig {
            host,
            port: env_or_parse("EM_SMTP_PORT", 587),
            username: env_opt("EM_SMTP_USERNAME"),
            password: env_opt("EM_SMTP_PASSWORD"),
        });

        let config = Self {
            api_port: env_or_parse("EM_API_PORT", defaults.api_port),
            storage,
            mongo_url: env_or("EM_MONGO_URL", &defaults.mongo_url),
            mongo_db: env_or("EM_MONGO_DB", &defaults.mongo_db),
            jwt_secret: env_or("EM_JWT_SECRET", &defaults.jwt_secret),
            jwt_issuer: env_or("EM_JWT_ISSUER", &defaults.jwt_issuer),
            access_token_ttl_secs: env_or_parse(
                "EM_ACCESS_TOKEN_TTL_SECS",
                defaults.access_token_ttl_secs,
            ),
            refresh_token_ttl_secs: env_or_parse(
                "EM_REFRESH_TOKEN_TTL_SECS",
                defaults.refresh_token_ttl_secs,
            ),
            media_root: env_opt("EM_MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.media_root),
            smtp,
            email_from: env_or("EM_EMAIL_FROM", &defaults.email_from),
            dev_mode: env_flag("EM_DEV_MODE"),
            admin_email: env_opt("EM_ADMIN_EMAIL"),
            admin_password: env_opt("EM_ADMIN_PASSWORD"),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PlatformError> {
        if self.jwt_secret.is_empty() {
            return Err(PlatformError::Configuration {
                message: "EM_JWT_SECRET must not be empty".to_string(),
            });
        }
        if self.access_token_ttl_secs <= 0 || self.refresh_token_ttl_secs <= 0 {
            return Err(PlatformError::Configuration {
                message: "Token lifetimes must be positive".to_string(),
            });
        }
        if !self.dev_mode && self.jwt_secret == DEV_JWT_SECRET {
            tracing::warn!("EM_JWT_SECRET is not set; using the development secret");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_backend_parse() {
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert_eq!("MongoDB".parse::<StorageBackend>().unwrap(), StorageBackend::Mongo);
        assert!("postgres".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = PlatformConfig::default();
        assert_eq!(config.api_port, 8000);
        assert_eq!(config.access_token_ttl_secs, 300);
        assert_eq!(config.refresh_token_ttl_secs, 86400);
        assert!(config.smtp.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_ttl() {
        let config = PlatformConfig {
            access_token_ttl_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
