//! OpenAPI Documentation
//!
//! Central OpenAPI document for the platform APIs.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Platform API OpenAPI Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Event Management API",
        version = "1.0.0",
        description = "REST APIs for accounts, companies, events and registrations"
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development")
    ),
    tags(
        (name = "accounts", description = "Sign-up, login and profiles"),
        (name = "topics", description = "Event topics"),
        (name = "companies", description = "Company management"),
        (name = "events", description = "Event management"),
        (name = "registrations", description = "Event registrations")
    ),
    nest(
        (path = "/api/accounts", api = AccountsApi),
        (path = "/api/topics", api = TopicsApi),
        (path = "/api/companies", api = CompaniesApi),
        (path = "/api/events", api = EventsApi),
        (path = "/api/registrations", api = RegistrationsApi)
    ),
    components(
        schemas(
            super::common::ApiError,
            super::common::ImageUpload,
            crate::domain::SocialMediaLink,
            crate::domain::SocialPlatform,
            crate::domain::TopicCategory,
            crate::domain::UserRole,
            crate::domain::DeliveryType,
            crate::domain::EventStatus,
            crate::domain::EventType,
            crate::domain::RegistrationStatus,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct PlatformApiDoc;

#[derive(OpenApi)]
#[openapi(paths(
    super::accounts::sign_up,
    super::accounts::login,
    super::accounts::refresh_token,
    super::accounts::create_organizer,
    super::accounts::get_current_user,
    super::accounts::upload_avatar,
))]
struct AccountsApi;

#[derive(OpenApi)]
#[openapi(paths(super::topics::list_topics))]
struct TopicsApi;

#[derive(OpenApi)]
#[openapi(paths(
    super::companies::list_companies,
    super::companies::create_company,
    super::companies::get_company,
    super::companies::update_company,
    super::companies::patch_company,
    super::companies::delete_company,
))]
struct CompaniesApi;

#[derive(OpenApi)]
#[openapi(paths(
    super::events::list_events,
    super::events::create_event,
    super::events::get_event,
    super::events::update_event,
    super::events::patch_event,
    super::events::delete_event,
    super::events::upload_event_image,
))]
struct EventsApi;

#[derive(OpenApi)]
#[openapi(paths(
    super::registrations::list_registrations,
    super::registrations::create_registration,
    super::registrations::update_registration,
))]
struct RegistrationsApi;

/// Registers the `bearer_auth` scheme referenced by the secured paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
