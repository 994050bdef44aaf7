//! Integration tests for the admin JSON API.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use common::{
    active_page, get, request_json, test_app, MemoryPageStore, MemorySettingsStore,
    TEST_ADMIN_TOKEN,
};
use pagecraft_api::app::create_app;
use pagecraft_api::config::Config;

fn admin_app() -> (Arc<MemoryPageStore>, axum::Router) {
    let store = Arc::new(MemoryPageStore::default());
    let app = test_app(store.clone(), Arc::new(MemorySettingsStore::default()));
    (store, app)
}

fn create_body(slug: &str) -> serde_json::Value {
    json!({
        "slug": slug,
        "title": "Corner Bakery",
        "html": "<h1>Fresh bread daily</h1>",
        "ownerId": Uuid::new_v4(),
        "published": true,
        "isPaid": true,
    })
}

#[tokio::test]
async fn test_admin_requires_token() {
    let (_, app) = admin_app();

    let (status, _) =
        request_json(&app, "POST", "/api/v1/admin/pages", None, Some(create_body("x"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = request_json(
        &app,
        "POST",
        "/api/v1/admin/pages",
        Some("wrong-token"),
        Some(create_body("x")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_disabled_without_configured_token() {
    let config = Config::load_for_test(&[("database.url", "postgres://unused")]).unwrap();
    let app = create_app(
        config,
        Arc::new(MemoryPageStore::default()),
        Arc::new(MemorySettingsStore::default()),
    );

    let (status, _) = request_json(
        &app,
        "GET",
        "/api/v1/admin/settings",
        Some(TEST_ADMIN_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_create_page_then_render_it() {
    let (_, app) = admin_app();

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/v1/admin/pages",
        Some(TEST_ADMIN_TOKEN),
        Some(create_body("corner-bakery")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["slug"], "corner-bakery");
    assert_eq!(body["status"], "active");

    let (status, html) = get(&app, "/corner-bakery").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<h1>Fresh bread daily</h1>"));
}

#[tokio::test]
async fn test_create_rejects_duplicate_slug() {
    let (_, app) = admin_app();

    let (status, _) = request_json(
        &app,
        "POST",
        "/api/v1/admin/pages",
        Some(TEST_ADMIN_TOKEN),
        Some(create_body("taken")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/v1/admin/pages",
        Some(TEST_ADMIN_TOKEN),
        Some(create_body("taken")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn test_create_rejects_reserved_slug() {
    let (_, app) = admin_app();

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/v1/admin/pages",
        Some(TEST_ADMIN_TOKEN),
        Some(create_body("admin")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_create_rejects_invalid_fields() {
    let (_, app) = admin_app();

    let mut body = create_body("valid-slug");
    body["ogImage"] = json!("not a url");
    let (status, _) = request_json(
        &app,
        "POST",
        "/api/v1/admin/pages",
        Some(TEST_ADMIN_TOKEN),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut body = create_body("valid-slug");
    body["title"] = json!("");
    let (status, _) = request_json(
        &app,
        "POST",
        "/api/v1/admin/pages",
        Some(TEST_ADMIN_TOKEN),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_owner_pages_reports_derived_status() {
    let owner_id = Uuid::new_v4();
    let mut draft = active_page("draft-one", "<p>x</p>");
    draft.published = false;
    draft.owner_id = owner_id;
    let mut expired = active_page("expired-one", "<p>x</p>");
    expired.expiry_date = Some(Utc::now() - Duration::days(1));
    expired.owner_id = owner_id;

    let store = Arc::new(MemoryPageStore::with_pages(vec![draft, expired]));
    let app = test_app(store, Arc::new(MemorySettingsStore::default()));

    let (status, body) = request_json(
        &app,
        "GET",
        &format!("/api/v1/admin/pages?ownerId={owner_id}"),
        Some(TEST_ADMIN_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let statuses: Vec<(&str, &str)> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| (p["slug"].as_str().unwrap(), p["status"].as_str().unwrap()))
        .collect();
    assert!(statuses.contains(&("draft-one", "not_published")));
    assert!(statuses.contains(&("expired-one", "expired")));
}

#[tokio::test]
async fn test_update_page_publish_and_slug_change() {
    let (_, app) = admin_app();

    let (_, created) = request_json(
        &app,
        "POST",
        "/api/v1/admin/pages",
        Some(TEST_ADMIN_TOKEN),
        Some(json!({
            "slug": "old-slug",
            "title": "Shop",
            "html": "<p>x</p>",
            "ownerId": Uuid::new_v4(),
        })),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["status"], "not_published");

    let (status, updated) = request_json(
        &app,
        "PUT",
        &format!("/api/v1/admin/pages/{id}"),
        Some(TEST_ADMIN_TOKEN),
        Some(json!({ "slug": "new-slug", "published": true, "isPaid": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["slug"], "new-slug");
    assert_eq!(updated["status"], "active");

    // The old slug no longer resolves; the new one does.
    let (status, _) = get(&app, "/old-slug").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get(&app, "/new-slug").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_can_clear_expiry_date() {
    let mut page = active_page("expiring", "<p>x</p>");
    page.expiry_date = Some(Utc::now() - Duration::days(1));
    let id = page.id;
    let store = Arc::new(MemoryPageStore::with_pages(vec![page]));
    let app = test_app(store, Arc::new(MemorySettingsStore::default()));

    let (status, _) = get(&app, "/expiring").await;
    assert_eq!(status, StatusCode::GONE);

    let (status, updated) = request_json(
        &app,
        "PUT",
        &format!("/api/v1/admin/pages/{id}"),
        Some(TEST_ADMIN_TOKEN),
        Some(json!({ "clearExpiryDate": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "active");
    assert!(updated.get("expiryDate").is_none());

    let (status, _) = get(&app, "/expiring").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_rejects_slug_conflict() {
    let first = active_page("first", "<p>x</p>");
    let second = active_page("second", "<p>x</p>");
    let second_id = second.id;
    let store = Arc::new(MemoryPageStore::with_pages(vec![first, second]));
    let app = test_app(store, Arc::new(MemorySettingsStore::default()));

    let (status, _) = request_json(
        &app,
        "PUT",
        &format!("/api/v1/admin/pages/{second_id}"),
        Some(TEST_ADMIN_TOKEN),
        Some(json!({ "slug": "first" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_page() {
    let page = active_page("short-lived", "<p>x</p>");
    let id = page.id;
    let store = Arc::new(MemoryPageStore::with_pages(vec![page]));
    let app = test_app(store, Arc::new(MemorySettingsStore::default()));

    let (status, _) = request_json(
        &app,
        "DELETE",
        &format!("/api/v1/admin/pages/{id}"),
        Some(TEST_ADMIN_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = request_json(
        &app,
        "GET",
        &format!("/api/v1/admin/pages/{id}"),
        Some(TEST_ADMIN_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&app, "/short-lived").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_settings_round_trip() {
    let (_, app) = admin_app();

    // Defaults come back before anything is stored.
    let (status, body) = request_json(
        &app,
        "GET",
        "/api/v1/admin/settings",
        Some(TEST_ADMIN_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["noticeTitle"], "Page Payment Required");

    let (status, body) = request_json(
        &app,
        "PUT",
        "/api/v1/admin/settings",
        Some(TEST_ADMIN_TOKEN),
        Some(json!({ "noticeTitle": "Renew today", "platformEmail": "team@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["noticeTitle"], "Renew today");
    assert_eq!(body["platformEmail"], "team@example.com");

    let (_, body) = request_json(
        &app,
        "GET",
        "/api/v1/admin/settings",
        Some(TEST_ADMIN_TOKEN),
        None,
    )
    .await;
    assert_eq!(body["noticeTitle"], "Renew today");
}

#[tokio::test]
async fn test_settings_rejects_invalid_email() {
    let (_, app) = admin_app();

    let (status, _) = request_json(
        &app,
        "PUT",
        "/api/v1/admin/settings",
        Some(TEST_ADMIN_TOKEN),
        Some(json!({ "platformEmail": "not-an-email" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
