//! Page admin API routes.
//!
//! JSON CRUD over the page collection. All routes sit behind the admin
//! bearer token. Slug uniqueness is check-then-write here, with the
//! database unique index as the backstop for the narrow race.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::{CreatePageRequest, NewPage, PageResponse, PageSummary, PageUpdate, UpdatePageRequest};
use domain::services::visibility::evaluate;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerQuery {
    pub owner_id: Uuid,
}

/// POST /api/v1/admin/pages
pub async fn create_page(
    State(state): State<AppState>,
    Json(request): Json<CreatePageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    // Field-level conflict before the write; the unique index catches the
    // remaining race and surfaces as the same 409.
    if state.store.find_by_slug(&request.slug).await?.is_some() {
        return Err(ApiError::Conflict(format!(
            "Slug '{}' is already taken",
            request.slug
        )));
    }

    let new_page = NewPage {
        slug: request.slug,
        title: request.title,
        meta_description: request.meta_description,
        seo_title: request.seo_title,
        og_image: request.og_image,
        html: request.html,
        owner_id: request.owner_id,
        published: request.published,
        is_paid: request.is_paid,
        purchase_date: request.purchase_date,
        expiry_date: request.expiry_date,
        plan_name: request.plan_name,
        created_by: None,
    };

    let page = state.store.create(new_page).await?;
    info!(page_id = %page.id, slug = %page.slug, "Created page");

    let status = evaluate(&page, Utc::now());
    Ok((
        StatusCode::CREATED,
        Json(PageResponse::from_page(page, status)),
    ))
}

/// GET /api/v1/admin/pages?ownerId=...
///
/// Lists an owner's pages, newest first, each with its derived status.
pub async fn list_owner_pages(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<PageSummary>>, ApiError> {
    let pages = state.store.find_by_owner(query.owner_id).await?;
    let now = Utc::now();
    let summaries = pages
        .iter()
        .map(|page| PageSummary::from_page(page, evaluate(page, now)))
        .collect();
    Ok(Json(summaries))
}

/// GET /api/v1/admin/pages/:page_id
pub async fn get_page(
    State(state): State<AppState>,
    Path(page_id): Path<Uuid>,
) -> Result<Json<PageResponse>, ApiError> {
    let page = state
        .store
        .find_by_id(page_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Page not found".to_string()))?;

    let status = evaluate(&page, Utc::now());
    Ok(Json(PageResponse::from_page(page, status)))
}

/// PUT /api/v1/admin/pages/:page_id
///
/// Partial update: absent fields keep their current values; the nullable
/// dates are cleared via explicit flags.
pub async fn update_page(
    State(state): State<AppState>,
    Path(page_id): Path<Uuid>,
    Json(request): Json<UpdatePageRequest>,
) -> Result<Json<PageResponse>, ApiError> {
    request.validate()?;

    let current = state
        .store
        .find_by_id(page_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Page not found".to_string()))?;

    // A slug change re-runs the uniqueness check against other pages.
    if let Some(new_slug) = &request.slug {
        if *new_slug != current.slug {
            if let Some(existing) = state.store.find_by_slug(new_slug).await? {
                if existing.id != page_id {
                    return Err(ApiError::Conflict(format!(
                        "Slug '{new_slug}' is already taken"
                    )));
                }
            }
        }
    }

    let purchase_date = if request.clear_purchase_date {
        None
    } else {
        request.purchase_date.or(current.purchase_date)
    };
    let expiry_date = if request.clear_expiry_date {
        None
    } else {
        request.expiry_date.or(current.expiry_date)
    };

    let update = PageUpdate {
        slug: request.slug.unwrap_or(current.slug),
        title: request.title.unwrap_or(current.title),
        meta_description: request.meta_description.or(current.meta_description),
        seo_title: request.seo_title.or(current.seo_title),
        og_image: request.og_image.or(current.og_image),
        html: request.html.unwrap_or(current.html),
        published: request.published.unwrap_or(current.published),
        is_paid: request.is_paid.unwrap_or(current.is_paid),
        purchase_date,
        expiry_date,
        plan_name: request.plan_name.unwrap_or(current.plan_name),
        last_edited_by: current.last_edited_by,
    };

    let page = state
        .store
        .update(page_id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Page not found".to_string()))?;

    info!(page_id = %page.id, slug = %page.slug, "Updated page");

    let status = evaluate(&page, Utc::now());
    Ok(Json(PageResponse::from_page(page, status)))
}

/// DELETE /api/v1/admin/pages/:page_id
pub async fn delete_page(
    State(state): State<AppState>,
    Path(page_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let removed = state.store.delete(page_id).await?;
    if !removed {
        return Err(ApiError::NotFound("Page not found".to_string()));
    }
    info!(page_id = %page_id, "Deleted page");
    Ok(StatusCode::NO_CONTENT)
}
