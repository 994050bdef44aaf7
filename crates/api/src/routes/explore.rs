//! Public explore surface: published pages, summaries only.

use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use domain::services::visibility::evaluate;
use shared::pagination::{decode_cursor, encode_cursor};

use crate::app::AppState;
use crate::error::ApiError;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct ExploreQuery {
    pub limit: Option<i64>,
    pub cursor: Option<String>,
}

/// Public summary: no HTML body, no payment fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPageSummary {
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExploreResponse {
    pub pages: Vec<PublicPageSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// GET /api/v1/pages
///
/// Cursor-paginated listing of publicly visible pages, newest first.
pub async fn list_published_pages(
    State(state): State<AppState>,
    Query(query): Query<ExploreQuery>,
) -> Result<Json<ExploreResponse>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(state.config.limits.default_page_size)
        .clamp(1, state.config.limits.max_page_size);

    let after = match query.cursor.as_deref() {
        Some(cursor) => Some(
            decode_cursor(cursor).map_err(|_| ApiError::Validation("Invalid cursor".into()))?,
        ),
        None => None,
    };

    let batch = state.store.list_published(limit, after).await?;

    // The cursor tracks the raw batch; visibility filtering happens after so
    // pagination never skips rows.
    let next_cursor = if batch.len() == limit as usize {
        batch.last().map(|p| encode_cursor(p.created_at, p.id))
    } else {
        None
    };

    let now = Utc::now();
    let pages = batch
        .iter()
        .filter(|page| evaluate(page, now).is_publicly_visible())
        .map(|page| PublicPageSummary {
            slug: page.slug.clone(),
            title: page.title.clone(),
            meta_description: page.meta_description.clone(),
            og_image: page.og_image.clone(),
        })
        .collect();

    Ok(Json(ExploreResponse { pages, next_cursor }))
}

/// GET /explore
///
/// Server-rendered listing for visitors.
pub async fn explore_html(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let batch = state
        .store
        .list_published(state.config.limits.max_page_size, None)
        .await?;

    let now = Utc::now();
    let entries: Vec<(String, String)> = batch
        .iter()
        .filter(|page| evaluate(page, now).is_publicly_visible())
        .map(|page| (page.slug.clone(), page.title.clone()))
        .collect();

    Ok(Html(views::explore_page(&entries)))
}
