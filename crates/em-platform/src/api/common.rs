//! Common API types and utilities

use axum::extract::{FromRequest, FromRequestParts, Multipart};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::error::PlatformError;

/// Standard API error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    pub error: String,
    pub message: String,
    /// Field errors, keyed by field name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// JSON body extractor that rejects with a [`PlatformError`] body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(PlatformError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor that rejects with a [`PlatformError`] body
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(PlatformError))]
pub struct ApiQuery<T>(pub T);

/// Multipart image upload, documented for the OpenAPI schema only
#[derive(Debug, ToSchema)]
pub struct ImageUpload {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Distinguishes an explicit `null` from an absent field in PATCH bodies.
/// Use with `#[serde(default, deserialize_with = "nullable")]`.
pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Read the named file field of a multipart body: original filename and bytes
pub async fn read_file_field(
    mut multipart: Multipart,
    name: &str,
) -> Result<(String, Vec<u8>), PlatformError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PlatformError::validation(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(name) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| PlatformError::validation(format!("Invalid multipart body: {}", e)))?;
        return Ok((filename, bytes.to_vec()));
    }
    Err(PlatformError::invalid_field(name, "No file was submitted."))
}
