//! Public page renderer route.
//!
//! `GET /{slug}` resolves a business page and renders it, or one of the
//! terminal pages. Unpublished pages are answered with the exact same 404 as
//! unknown slugs, so the response never reveals whether a hidden page
//! exists. Expired pages are distinct on purpose: they were already public
//! and the owner-facing renew prompt has value.

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};

use domain::services::controller::{UnavailableReason, ViewOutcome};

use crate::app::AppState;
use crate::views;

/// GET /
pub async fn index() -> Html<String> {
    Html(views::index_page())
}

/// GET /{slug}
pub async fn render_page(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    // A slug that can't exist (bad format or reserved word) skips the store
    // read entirely.
    if shared::validation::validate_slug_format(&slug).is_err()
        || shared::validation::is_reserved_slug(&slug)
    {
        return html_response(StatusCode::NOT_FOUND, views::not_found_page());
    }

    match state.controller.activate(&slug).await {
        ViewOutcome::NotFound | ViewOutcome::Unavailable(UnavailableReason::NotPublished) => {
            html_response(StatusCode::NOT_FOUND, views::not_found_page())
        }
        ViewOutcome::Unavailable(UnavailableReason::Expired) => {
            html_response(StatusCode::GONE, views::expired_page())
        }
        ViewOutcome::Unavailable(_) | ViewOutcome::Superseded => {
            html_response(StatusCode::SERVICE_UNAVAILABLE, views::unavailable_page())
        }
        ViewOutcome::Visible {
            page, plan, notice, ..
        } => {
            let body = views::visible_page(&page, &plan, notice.as_ref());
            let mut response = html_response(StatusCode::OK, body);
            // The notice gate is per-view state; never cache it.
            response.headers_mut().insert(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-store"),
            );
            response
        }
    }
}

fn html_response(status: StatusCode, body: String) -> Response {
    (status, Html(body)).into_response()
}
