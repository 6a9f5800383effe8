//! API Layer
//!
//! REST endpoints under `/api`, one router per resource. Handlers
//! authenticate through the [`Authenticated`] extractor, which reads the
//! shared [`AppState`] installed as a request extension.

pub mod accounts;
pub mod common;
pub mod companies;
pub mod events;
pub mod middleware;
pub mod openapi;
pub mod registrations;
pub mod topics;

pub use common::*;
pub use middleware::{AppState, Authenticated};
pub use openapi::PlatformApiDoc;

pub use accounts::{accounts_router, AccountsState};
pub use companies::{companies_router, CompaniesState};
pub use events::{events_router, EventsState};
pub use registrations::{registrations_router, RegistrationsState};
pub use topics::{topics_router, TopicsState};

use axum::{Extension, Router};
use std::sync::Arc;

use crate::config::PlatformConfig;
use crate::media::MediaStore;
use crate::notification::NotificationQueue;
use crate::repository::Repositories;
use crate::service::{
    AccountService, AdmissionLocks, AuthConfig, AuthService, AuthorizationService, CompanyService,
    EventService, PasswordService, RegistrationService,
};

/// Services shared by all routers, built once at startup
#[derive(Clone)]
pub struct PlatformServices {
    pub repos: Repositories,
    pub auth_service: Arc<AuthService>,
    pub authz_service: Arc<AuthorizationService>,
    pub password_service: Arc<PasswordService>,
    pub account_service: Arc<AccountService>,
    pub company_service: Arc<CompanyService>,
    pub event_service: Arc<EventService>,
    pub registration_service: Arc<RegistrationService>,
}

impl PlatformServices {
    pub fn new(repos: Repositories, config: &PlatformConfig, notifications: NotificationQueue) -> Self {
        let auth_service = Arc::new(AuthService::new(AuthConfig {
            secret_key: config.jwt_secret.clone(),
            issuer: config.jwt_issuer.clone(),
            access_token_expiry_secs: config.access_token_ttl_secs,
            refresh_token_expiry_secs: config.refresh_token_ttl_secs,
        }));
        let authz_service = Arc::new(AuthorizationService::new(
            repos.users.clone(),
            repos.participants.clone(),
            repos.organizers.clone(),
        ));
        let password_service = Arc::new(PasswordService::default());
        let media = MediaStore::new(config.media_root.clone());

        let account_service = Arc::new(AccountService::new(
            repos.clone(),
            auth_service.clone(),
            password_service.clone(),
            media.clone(),
            notifications.clone(),
        ));
        let admission_locks = AdmissionLocks::default();
        let company_service = Arc::new(CompanyService::new(repos.clone(), admission_locks.clone()));
        let event_service = Arc::new(EventService::new(
            repos.clone(),
            media,
            admission_locks.clone(),
        ));
        let registration_service = Arc::new(RegistrationService::new(
            repos.clone(),
            notifications,
            admission_locks,
        ));

        Self {
            repos,
            auth_service,
            authz_service,
            password_service,
            account_service,
            company_service,
            event_service,
            registration_service,
        }
    }

    pub fn app_state(&self) -> AppState {
        AppState {
            auth_service: self.auth_service.clone(),
            authz_service: self.authz_service.clone(),
        }
    }
}

/// All `/api` routes with authentication state attached
pub fn platform_router(services: &PlatformServices) -> Router {
    Router::new()
        .nest(
            "/api/accounts",
            accounts_router(AccountsState {
                account_service: services.account_service.clone(),
                auth_service: services.auth_service.clone(),
            }),
        )
        .nest(
            "/api/topics",
            topics_router(TopicsState {
                topic_repo: services.repos.topics.clone(),
            }),
        )
        .nest(
            "/api/companies",
            companies_router(CompaniesState {
                company_service: services.company_service.clone(),
            }),
        )
        .nest(
            "/api/events",
            events_router(EventsState {
                event_service: services.event_service.clone(),
            }),
        )
        .nest(
            "/api/registrations",
            registrations_router(RegistrationsState {
                registration_service: services.registration_service.clone(),
            }),
        )
        .layer(Extension(services.app_state()))
}
