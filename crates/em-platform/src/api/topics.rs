//! Topics API

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::middleware::Authenticated;
use crate::domain::{Topic, TopicCategory};
use crate::error::PlatformError;
use crate::repository::TopicRepository;

#[derive(Debug, Serialize, ToSchema)]
pub struct TopicResponse {
    pub id: String,
    pub name: TopicCategory,
    /// Human readable name
    pub label: String,
}

impl From<Topic> for TopicResponse {
    fn from(t: Topic) -> Self {
        Self {
            id: t.id,
            name: t.name,
            label: t.name.label().to_string(),
        }
    }
}

#[derive(Clone)]
pub struct TopicsState {
    pub topic_repo: Arc<dyn TopicRepository>,
}

/// List all topics
#[utoipa::path(
    get,
    path = "",
    tag = "topics",
    responses(
        (status = 200, description = "List of topics", body = Vec<TopicResponse>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_topics(
    State(state): State<TopicsState>,
    _auth: Authenticated,
) -> Result<Json<Vec<TopicResponse>>, PlatformError> {
    let topics = state.topic_repo.find_all().await?;
    Ok(Json(topics.into_iter().map(Into::into).collect()))
}

pub fn topics_router(state: TopicsState) -> Router {
    Router::new()
        .route("/", get(list_topics))
        .with_state(state)
}
