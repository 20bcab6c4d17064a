use crate::api::{AppState, AuthenticatedUser};
use crate::error::{AppError, Result};
use crate::metrics::gather_metrics;
use crate::models::{CatalogItem, Preferences, TagCounts};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Search the catalog
pub async fn search_items(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<CatalogItem>>> {
    let query = params.q.unwrap_or_default();
    let items = state.processor.search(&user, &query).await?;
    Ok(Json(items))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Boost every tag of an item
pub async fn increment_tag(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    payload: std::result::Result<Json<IncrementTagRequest>, JsonRejection>,
) -> Result<Json<IncrementTagResponse>> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    request.validate()?;

    let item_name = request.name.as_str();
    if item_name.trim().is_empty() {
        return Err(AppError::Validation("name must not be blank".to_string()));
    }

    let boost = state.processor.increment_tags(&user, item_name).await?;

    Ok(Json(IncrementTagResponse {
        message: format!("Tags for '{}' updated successfully!", item_name),
        tags: boost.tags,
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct IncrementTagRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IncrementTagResponse {
    pub message: String,
    pub tags: TagCounts,
}

/// Aggregated tag preferences of the caller
pub async fn get_preferences(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<PreferencesResponse>> {
    let response = match state.processor.get_preferences(&user).await? {
        Preferences::Profile(tags) => PreferencesResponse::Profile { tags },
        Preferences::NoHistory => PreferencesResponse::NoHistory {
            message: format!("No history found for user: {}", user),
        },
    };
    Ok(Json(response))
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreferencesResponse {
    Profile { tags: TagCounts },
    NoHistory { message: String },
}

/// Prometheus scrape endpoint
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        gather_metrics(),
    )
}
