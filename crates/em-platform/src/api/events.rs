//! Events API
//!
//! REST endpoints for event management. Every event is returned with its
//! confirmed participant count and remaining capacity.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::api::common::{nullable, read_file_field, ApiJson, ApiQuery, ImageUpload};
use crate::api::middleware::Authenticated;
use crate::domain::{DeliveryType, EventStatus, EventType, SocialMediaLink};
use crate::error::PlatformError;
use crate::repository::EventFilter;
use crate::service::{EventChanges, EventInput, EventService, EventView};

/// Create or fully replace an event
#[derive(Debug, Deserialize, ToSchema)]
pub struct EventRequest {
    pub title: String,
    pub description: String,
    pub event_start_date: NaiveDate,
    #[schema(value_type = String, example = "18:30:00")]
    pub event_start_time: NaiveTime,
    pub event_end_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>)]
    pub event_end_time: Option<NaiveTime>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    pub location: String,
    /// Maximum confirmed participants; null or 0 for unlimited
    pub capacity: Option<u32>,
    pub delivery_type: DeliveryType,
    pub status: EventStatus,
    pub event_type: EventType,
    /// Topic ids
    #[serde(default)]
    pub topics: Vec<String>,
    /// Company id
    pub company: String,
    /// Organizer id; staff must set it, organizers always own their events
    pub organizer: Option<String>,
    #[serde(default)]
    pub social_media: Vec<SocialMediaLink>,
}

impl From<EventRequest> for EventInput {
    fn from(r: EventRequest) -> Self {
        Self {
            title: r.title,
            description: r.description,
            event_start_date: r.event_start_date,
            event_start_time: r.event_start_time,
            event_end_date: r.event_end_date,
            event_end_time: r.event_end_time,
            city: r.city,
            country: r.country,
            location: r.location,
            capacity: r.capacity,
            delivery_type: r.delivery_type,
            status: r.status,
            event_type: r.event_type,
            topics: r.topics,
            company_id: r.company,
            organizer_id: r.organizer,
            social_media: r.social_media,
        }
    }
}

/// Partial event update. Absent fields are left alone; `null` clears the
/// optional end date, end time and capacity.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PatchEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>)]
    pub event_start_time: Option<NaiveTime>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<NaiveDate>)]
    pub event_end_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub event_end_time: Option<Option<NaiveTime>>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub location: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<u32>)]
    pub capacity: Option<Option<u32>>,
    pub delivery_type: Option<DeliveryType>,
    pub status: Option<EventStatus>,
    pub event_type: Option<EventType>,
    pub topics: Option<Vec<String>>,
    pub company: Option<String>,
    pub organizer: Option<String>,
    pub social_media: Option<Vec<SocialMediaLink>>,
}

impl From<PatchEventRequest> for EventChanges {
    fn from(r: PatchEventRequest) -> Self {
        Self {
            title: r.title,
            description: r.description,
            event_start_date: r.event_start_date,
            event_start_time: r.event_start_time,
            event_end_date: r.event_end_date,
            event_end_time: r.event_end_time,
            city: r.city,
            country: r.country,
            location: r.location,
            capacity: r.capacity,
            delivery_type: r.delivery_type,
            status: r.status,
            event_type: r.event_type,
            topics: r.topics,
            company_id: r.company,
            organizer_id: r.organizer,
            social_media: r.social_media,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EventResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub event_start_date: NaiveDate,
    #[schema(value_type = String)]
    pub event_start_time: NaiveTime,
    pub event_end_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>)]
    pub event_end_time: Option<NaiveTime>,
    pub city: String,
    pub country: String,
    pub location: String,
    pub capacity: Option<u32>,
    /// Confirmed registrations
    pub participants_count: u64,
    /// Remaining spots; null when unlimited
    pub available_capacity: Option<i64>,
    pub delivery_type: DeliveryType,
    pub status: EventStatus,
    pub event_type: EventType,
    pub topics: Vec<String>,
    pub company: String,
    pub organizer: String,
    pub image: Option<String>,
    pub slug: String,
    pub social_media: Vec<SocialMediaLink>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventView> for EventResponse {
    fn from(v: EventView) -> Self {
        let e = v.event;
        Self {
            id: e.id,
            title: e.title,
            description: e.description,
            event_start_date: e.event_start_date,
            event_start_time: e.event_start_time,
            event_end_date: e.event_end_date,
            event_end_time: e.event_end_time,
            city: e.city,
            country: e.country,
            location: e.location,
            capacity: e.capacity,
            participants_count: v.participants_count,
            available_capacity: v.available_capacity,
            delivery_type: e.delivery_type,
            status: e.status,
            event_type: e.event_type,
            topics: e.topics,
            company: e.company_id,
            organizer: e.organizer_id,
            image: e.image,
            slug: e.slug,
            social_media: e.social_media,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

/// Query parameters for events list
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventsQuery {
    /// Filter by company id
    pub company: Option<String>,

    /// Filter by topic id
    pub topic: Option<String>,

    /// Filter by status
    pub status: Option<EventStatus>,
}

impl From<EventsQuery> for EventFilter {
    fn from(q: EventsQuery) -> Self {
        Self {
            company_id: q.company,
            organizer_id: None,
            topic_id: q.topic,
            status: q.status,
        }
    }
}

#[derive(Clone)]
pub struct EventsState {
    pub event_service: Arc<EventService>,
}

/// List events
#[utoipa::path(
    get,
    path = "",
    tag = "events",
    params(EventsQuery),
    responses(
        (status = 200, description = "List of events", body = Vec<EventResponse>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_events(
    State(state): State<EventsState>,
    _auth: Authenticated,
    ApiQuery(query): ApiQuery<EventsQuery>,
) -> Result<Json<Vec<EventResponse>>, PlatformError> {
    let events = state.event_service.list(&query.into()).await?;
    Ok(Json(events.into_iter().map(Into::into).collect()))
}

/// Create an event
#[utoipa::path(
    post,
    path = "",
    tag = "events",
    request_body = EventRequest,
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Staff or organizers only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_event(
    State(state): State<EventsState>,
    auth: Authenticated,
    ApiJson(req): ApiJson<EventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), PlatformError> {
    let event = state.event_service.create(&auth.0, req.into()).await?;
    Ok((StatusCode::CREATED, Json(event.into())))
}

/// Get event by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "events",
    params(
        ("id" = String, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = EventResponse),
        (status = 404, description = "Event not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_event(
    State(state): State<EventsState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<EventResponse>, PlatformError> {
    let event = state.event_service.get(&id).await?;
    Ok(Json(event.into()))
}

/// Replace an event
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "events",
    params(
        ("id" = String, Path, description = "Event ID")
    ),
    request_body = EventRequest,
    responses(
        (status = 200, description = "Event updated", body = EventResponse),
        (status = 403, description = "Not the event's organizer"),
        (status = 404, description = "Event not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_event(
    State(state): State<EventsState>,
    auth: Authenticated,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<EventRequest>,
) -> Result<Json<EventResponse>, PlatformError> {
    let input: EventInput = req.into();
    let event = state.event_service.update(&auth.0, &id, input.into()).await?;
    Ok(Json(event.into()))
}

/// Partially update an event
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "events",
    params(
        ("id" = String, Path, description = "Event ID")
    ),
    request_body = PatchEventRequest,
    responses(
        (status = 200, description = "Event updated", body = EventResponse),
        (status = 403, description = "Not the event's organizer"),
        (status = 404, description = "Event not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn patch_event(
    State(state): State<EventsState>,
    auth: Authenticated,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<PatchEventRequest>,
) -> Result<Json<EventResponse>, PlatformError> {
    let event = state.event_service.update(&auth.0, &id, req.into()).await?;
    Ok(Json(event.into()))
}

/// Delete an event with its registrations
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "events",
    params(
        ("id" = String, Path, description = "Event ID")
    ),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 403, description = "Not the event's organizer"),
        (status = 404, description = "Event not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_event(
    State(state): State<EventsState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<StatusCode, PlatformError> {
    state.event_service.delete(&auth.0, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Upload the event image (multipart field `image`)
#[utoipa::path(
    put,
    path = "/{id}/image",
    tag = "events",
    params(
        ("id" = String, Path, description = "Event ID")
    ),
    request_body(content = ImageUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image updated", body = EventResponse),
        (status = 400, description = "Missing or invalid image"),
        (status = 403, description = "Not the event's organizer")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_event_image(
    State(state): State<EventsState>,
    auth: Authenticated,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<EventResponse>, PlatformError> {
    let (filename, bytes) = read_file_field(multipart, "image").await?;
    let event = state
        .event_service
        .update_image(&auth.0, &id, &filename, &bytes)
        .await?;
    Ok(Json(event.into()))
}

pub fn events_router(state: EventsState) -> Router {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route(
            "/:id",
            get(get_event)
                .put(update_event)
                .patch(patch_event)
                .delete(delete_event),
        )
        .route("/:id/image", put(upload_event_image))
        .with_state(state)
}
