//! Registrations API

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::api::common::{ApiJson, ApiQuery};
use crate::api::middleware::Authenticated;
use crate::domain::{EventRegistration, RegistrationStatus};
use crate::error::PlatformError;
use crate::service::{NewRegistration, RegistrationService};

/// Register for an event
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRegistrationRequest {
    /// Event id
    pub event: String,
    /// Participant id; staff only
    pub participant: Option<String>,
    /// Initial status; staff only, participants always start as PENDING
    pub status: Option<RegistrationStatus>,
}

impl From<CreateRegistrationRequest> for NewRegistration {
    fn from(r: CreateRegistrationRequest) -> Self {
        Self {
            event_id: r.event,
            participant_id: r.participant,
            status: r.status,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRegistrationRequest {
    pub status: RegistrationStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegistrationResponse {
    pub id: String,
    pub participant: String,
    pub event: String,
    pub status: RegistrationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventRegistration> for RegistrationResponse {
    fn from(r: EventRegistration) -> Self {
        Self {
            id: r.id,
            participant: r.participant_id,
            event: r.event_id,
            status: r.status,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RegistrationsQuery {
    /// Filter by status
    pub status: Option<RegistrationStatus>,
}

#[derive(Clone)]
pub struct RegistrationsState {
    pub registration_service: Arc<RegistrationService>,
}

/// List registrations visible to the caller
#[utoipa::path(
    get,
    path = "",
    tag = "registrations",
    params(RegistrationsQuery),
    responses(
        (status = 200, description = "List of registrations", body = Vec<RegistrationResponse>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_registrations(
    State(state): State<RegistrationsState>,
    auth: Authenticated,
    ApiQuery(query): ApiQuery<RegistrationsQuery>,
) -> Result<Json<Vec<RegistrationResponse>>, PlatformError> {
    let registrations = state
        .registration_service
        .list(&auth.0, query.status)
        .await?;
    Ok(Json(registrations.into_iter().map(Into::into).collect()))
}

/// Register for an event. Full events put the registration on the waitlist.
#[utoipa::path(
    post,
    path = "",
    tag = "registrations",
    request_body = CreateRegistrationRequest,
    responses(
        (status = 201, description = "Registration created", body = RegistrationResponse),
        (status = 400, description = "Validation error or already registered"),
        (status = 403, description = "Staff or participants only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_registration(
    State(state): State<RegistrationsState>,
    auth: Authenticated,
    ApiJson(req): ApiJson<CreateRegistrationRequest>,
) -> Result<(StatusCode, Json<RegistrationResponse>), PlatformError> {
    let registration = state
        .registration_service
        .create(&auth.0, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(registration.into())))
}

/// Change a registration's status
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "registrations",
    params(
        ("id" = String, Path, description = "Registration ID")
    ),
    request_body = UpdateRegistrationRequest,
    responses(
        (status = 200, description = "Registration updated", body = RegistrationResponse),
        (status = 403, description = "Not allowed to modify this registration"),
        (status = 404, description = "Registration not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_registration(
    State(state): State<RegistrationsState>,
    auth: Authenticated,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateRegistrationRequest>,
) -> Result<Json<RegistrationResponse>, PlatformError> {
    let registration = state
        .registration_service
        .update_status(&auth.0, &id, req.status)
        .await?;
    Ok(Json(registration.into()))
}

pub fn registrations_router(state: RegistrationsState) -> Router {
    Router::new()
        .route("/", get(list_registrations).post(create_registration))
        .route("/:id", put(update_registration))
        .with_state(state)
}
