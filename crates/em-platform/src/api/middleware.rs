//! API Middleware
//!
//! Bearer token authentication for axum handlers.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::common::ApiError;
use crate::service::{extract_bearer_token, AuthContext, AuthService, AuthorizationService};

/// Shared authentication services, installed as a request extension
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub authz_service: Arc<AuthorizationService>,
}

fn reject(status: StatusCode, error: &str, message: &str) -> Response {
    let body = ApiError {
        error: error.to_string(),
        message: message.to_string(),
        details: None,
    };
    (status, Json(body)).into_response()
}

/// Extractor for authenticated requests.
/// Validates the access token and resolves the caller's profiles.
pub struct Authenticated(pub AuthContext);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                reject(
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    "Authentication credentials were not provided.",
                )
            })?;

        let token = extract_bearer_token(header).ok_or_else(|| {
            reject(
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Invalid Authorization header format",
            )
        })?;

        let app_state = parts.extensions.get::<AppState>().ok_or_else(|| {
            reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "AppState not found",
            )
        })?;

        let claims = app_state
            .auth_service
            .validate_token(token)
            .map_err(|e| e.into_response())?;

        let context = app_state
            .authz_service
            .build_context(&claims)
            .await
            .map_err(|e| e.into_response())?;

        Ok(Authenticated(context))
    }
}
