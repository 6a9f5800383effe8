//! Accounts API
//!
//! - POST /sign-up - Participant self-registration
//! - POST /login - Email and password login
//! - POST /login/refresh - Exchange a refresh token for an access token
//! - POST /organizers - Staff create organizer accounts
//! - GET /me - Current user
//! - PUT /me/avatar - Upload the current user's avatar

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::common::{read_file_field, ApiJson, ImageUpload};
use crate::api::middleware::Authenticated;
use crate::domain::{Organizer, Participant, SocialMediaLink, UserRole};
use crate::error::PlatformError;
use crate::service::{checks, AccountService, AuthService, NewOrganizer, Profile, SignUp};

/// Participant sign-up request
#[derive(Debug, Deserialize, ToSchema)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub phone: String,
    /// Topic ids the participant is interested in
    #[serde(default)]
    pub interests: Vec<String>,
}

impl From<SignUpRequest> for SignUp {
    fn from(r: SignUpRequest) -> Self {
        Self {
            email: r.email,
            password: r.password,
            confirm_password: r.confirm_password,
            first_name: r.first_name,
            last_name: r.last_name,
            phone: r.phone,
            interests: r.interests,
        }
    }
}

/// Organizer creation request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrganizerRequest {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub phone: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub social_media: Vec<SocialMediaLink>,
}

impl From<CreateOrganizerRequest> for NewOrganizer {
    fn from(r: CreateOrganizerRequest) -> Self {
        Self {
            email: r.email,
            first_name: r.first_name,
            last_name: r.last_name,
            phone: r.phone,
            bio: r.bio,
            city: r.city,
            country: r.country,
            social_media: r.social_media,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Token pair issued on login
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub refresh: String,
    pub access: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub access: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrganizerResponse {
    pub id: String,
    pub bio: String,
    pub city: String,
    pub country: String,
    pub social_media: Vec<SocialMediaLink>,
}

impl From<Organizer> for OrganizerResponse {
    fn from(o: Organizer) -> Self {
        Self {
            id: o.id,
            bio: o.bio,
            city: o.city,
            country: o.country,
            social_media: o.social_media,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ParticipantResponse {
    pub id: String,
    pub interests: Vec<String>,
}

impl From<Participant> for ParticipantResponse {
    fn from(p: Participant) -> Self {
        Self {
            id: p.id,
            interests: p.interests,
        }
    }
}

/// User with its resolved role and profile
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub role: Option<UserRole>,
    pub role_display: Option<String>,
    pub date_joined: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant: Option<ParticipantResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizer: Option<OrganizerResponse>,
}

impl From<Profile> for UserResponse {
    fn from(p: Profile) -> Self {
        let role = match (&p.organizer, &p.participant) {
            (Some(_), _) => Some(Organizer::ROLE),
            (None, Some(_)) => Some(Participant::ROLE),
            (None, None) => None,
        };
        Self {
            id: p.user.id,
            email: p.user.email,
            phone: p.user.phone,
            first_name: p.user.first_name,
            last_name: p.user.last_name,
            avatar: p.user.avatar,
            is_staff: p.user.is_staff,
            is_superuser: p.user.is_superuser,
            role,
            role_display: role.map(|r| r.label().to_string()),
            date_joined: p.user.date_joined,
            participant: p.participant.map(Into::into),
            organizer: p.organizer.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SignUpResponse {
    pub refresh: String,
    pub access: String,
    pub message: String,
    pub user: UserResponse,
}

/// Accounts service state
#[derive(Clone)]
pub struct AccountsState {
    pub account_service: Arc<AccountService>,
    pub auth_service: Arc<AuthService>,
}

/// Register a participant account
#[utoipa::path(
    post,
    path = "/sign-up",
    tag = "accounts",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created", body = SignUpResponse),
        (status = 400, description = "Validation error")
    )
)]
pub async fn sign_up(
    State(state): State<AccountsState>,
    ApiJson(req): ApiJson<SignUpRequest>,
) -> Result<(StatusCode, Json<SignUpResponse>), PlatformError> {
    let (profile, tokens) = state.account_service.sign_up(req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            refresh: tokens.refresh,
            access: tokens.access,
            message: "User profile created successfully.".to_string(),
            user: profile.into(),
        }),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/login",
    tag = "accounts",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AccountsState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, PlatformError> {
    let (_user, tokens) = state.account_service.login(&req.email, &req.password).await?;

    Ok(Json(LoginResponse {
        refresh: tokens.refresh,
        access: tokens.access,
        expires_in: state.auth_service.access_token_expiry_secs(),
    }))
}

/// Obtain a new access token
#[utoipa::path(
    post,
    path = "/login/refresh",
    tag = "accounts",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Token refreshed", body = RefreshResponse),
        (status = 401, description = "Invalid or expired refresh token")
    )
)]
pub async fn refresh_token(
    State(state): State<AccountsState>,
    ApiJson(req): ApiJson<RefreshRequest>,
) -> Result<Json<RefreshResponse>, PlatformError> {
    let access = state.account_service.refresh(&req.refresh).await?;
    Ok(Json(RefreshResponse { access }))
}

/// Create an organizer account; credentials are emailed to the organizer
#[utoipa::path(
    post,
    path = "/organizers",
    tag = "accounts",
    request_body = CreateOrganizerRequest,
    responses(
        (status = 201, description = "Organizer created", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Staff only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_organizer(
    State(state): State<AccountsState>,
    auth: Authenticated,
    ApiJson(req): ApiJson<CreateOrganizerRequest>,
) -> Result<(StatusCode, Json<UserResponse>), PlatformError> {
    checks::require_staff(&auth.0)?;

    let profile = state.account_service.create_organizer(req.into()).await?;
    Ok((StatusCode::CREATED, Json(profile.into())))
}

/// Current user
#[utoipa::path(
    get,
    path = "/me",
    tag = "accounts",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_current_user(
    State(state): State<AccountsState>,
    auth: Authenticated,
) -> Result<Json<UserResponse>, PlatformError> {
    let profile = state.account_service.profile(&auth.0.user_id).await?;
    Ok(Json(profile.into()))
}

/// Upload an avatar (multipart field `avatar`)
#[utoipa::path(
    put,
    path = "/me/avatar",
    tag = "accounts",
    request_body(content = ImageUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Avatar updated", body = UserResponse),
        (status = 400, description = "Missing or invalid image")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_avatar(
    State(state): State<AccountsState>,
    auth: Authenticated,
    multipart: Multipart,
) -> Result<Json<UserResponse>, PlatformError> {
    let (filename, bytes) = read_file_field(multipart, "avatar").await?;
    state
        .account_service
        .update_avatar(&auth.0.user_id, &filename, &bytes)
        .await?;

    let profile = state.account_service.profile(&auth.0.user_id).await?;
    Ok(Json(profile.into()))
}

/// Create accounts router
pub fn accounts_router(state: AccountsState) -> Router {
    Router::new()
        .route("/sign-up", post(sign_up))
        .route("/login", post(login))
        .route("/login/refresh", post(refresh_token))
        .route("/organizers", post(create_organizer))
        .route("/me", get(get_current_user))
        .route("/me/avatar", put(upload_avatar))
        .with_state(state)
}
