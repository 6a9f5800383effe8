//! Companies API
//!
//! Companies are addressed by slug. Reads are open to any authenticated
//! user; writes need a superuser.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::common::ApiJson;
use crate::api::middleware::Authenticated;
use crate::domain::{Company, SocialMediaLink};
use crate::error::PlatformError;
use crate::service::{checks, CompanyChanges, CompanyInput, CompanyService};

/// Create or fully replace a company
#[derive(Debug, Deserialize, ToSchema)]
pub struct CompanyRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub website_url: String,
    #[serde(default)]
    pub social_media: Vec<SocialMediaLink>,
}

impl From<CompanyRequest> for CompanyInput {
    fn from(r: CompanyRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            website_url: r.website_url,
            social_media: r.social_media,
        }
    }
}

/// Partial company update; absent fields are left alone
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PatchCompanyRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website_url: Option<String>,
    pub social_media: Option<Vec<SocialMediaLink>>,
}

impl From<PatchCompanyRequest> for CompanyChanges {
    fn from(r: PatchCompanyRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            website_url: r.website_url,
            social_media: r.social_media,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub website_url: String,
    pub slug: String,
    pub social_media: Vec<SocialMediaLink>,
    /// dd.mm.YYYY HH:MM
    pub created_at: String,
    pub updated_at: String,
}

impl From<Company> for CompanyResponse {
    fn from(c: Company) -> Self {
        Self {
            created_at: c.formatted_created_at(),
            updated_at: c.updated_at.to_rfc3339(),
            id: c.id,
            name: c.name,
            description: c.description,
            website_url: c.website_url,
            slug: c.slug,
            social_media: c.social_media,
        }
    }
}

#[derive(Clone)]
pub struct CompaniesState {
    pub company_service: Arc<CompanyService>,
}

/// List companies
#[utoipa::path(
    get,
    path = "",
    tag = "companies",
    responses(
        (status = 200, description = "List of companies", body = Vec<CompanyResponse>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_companies(
    State(state): State<CompaniesState>,
    _auth: Authenticated,
) -> Result<Json<Vec<CompanyResponse>>, PlatformError> {
    let companies = state.company_service.list().await?;
    Ok(Json(companies.into_iter().map(Into::into).collect()))
}

/// Create a company
#[utoipa::path(
    post,
    path = "",
    tag = "companies",
    request_body = CompanyRequest,
    responses(
        (status = 201, description = "Company created", body = CompanyResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Superuser only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_company(
    State(state): State<CompaniesState>,
    auth: Authenticated,
    ApiJson(req): ApiJson<CompanyRequest>,
) -> Result<(StatusCode, Json<CompanyResponse>), PlatformError> {
    checks::require_superuser(&auth.0)?;

    let company = state.company_service.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(company.into())))
}

/// Get company by slug
#[utoipa::path(
    get,
    path = "/{slug}",
    tag = "companies",
    params(
        ("slug" = String, Path, description = "Company slug")
    ),
    responses(
        (status = 200, description = "Company found", body = CompanyResponse),
        (status = 404, description = "Company not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_company(
    State(state): State<CompaniesState>,
    _auth: Authenticated,
    Path(slug): Path<String>,
) -> Result<Json<CompanyResponse>, PlatformError> {
    let company = state.company_service.get(&slug).await?;
    Ok(Json(company.into()))
}

/// Replace a company; omitted social media links are removed
#[utoipa::path(
    put,
    path = "/{slug}",
    tag = "companies",
    params(
        ("slug" = String, Path, description = "Company slug")
    ),
    request_body = CompanyRequest,
    responses(
        (status = 200, description = "Company updated", body = CompanyResponse),
        (status = 404, description = "Company not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_company(
    State(state): State<CompaniesState>,
    auth: Authenticated,
    Path(slug): Path<String>,
    ApiJson(req): ApiJson<CompanyRequest>,
) -> Result<Json<CompanyResponse>, PlatformError> {
    checks::require_superuser(&auth.0)?;

    let input: CompanyInput = req.into();
    let company = state.company_service.update(&slug, input.into()).await?;
    Ok(Json(company.into()))
}

/// Partially update a company
#[utoipa::path(
    patch,
    path = "/{slug}",
    tag = "companies",
    params(
        ("slug" = String, Path, description = "Company slug")
    ),
    request_body = PatchCompanyRequest,
    responses(
        (status = 200, description = "Company updated", body = CompanyResponse),
        (status = 404, description = "Company not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn patch_company(
    State(state): State<CompaniesState>,
    auth: Authenticated,
    Path(slug): Path<String>,
    ApiJson(req): ApiJson<PatchCompanyRequest>,
) -> Result<Json<CompanyResponse>, PlatformError> {
    checks::require_superuser(&auth.0)?;

    let company = state.company_service.update(&slug, req.into()).await?;
    Ok(Json(company.into()))
}

/// Delete a company with its events
#[utoipa::path(
    delete,
    path = "/{slug}",
    tag = "companies",
    params(
        ("slug" = String, Path, description = "Company slug")
    ),
    responses(
        (status = 204, description = "Company deleted"),
        (status = 404, description = "Company not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_company(
    State(state): State<CompaniesState>,
    auth: Authenticated,
    Path(slug): Path<String>,
) -> Result<StatusCode, PlatformError> {
    checks::require_superuser(&auth.0)?;

    state.company_service.delete(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn companies_router(state: CompaniesState) -> Router {
    Router::new()
        .route("/", get(list_companies).post(create_company))
        .route(
            "/:slug",
            get(get_company)
                .put(update_company)
                .patch(patch_company)
                .delete(delete_company),
        )
        .with_state(state)
}
