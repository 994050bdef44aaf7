//! Common test utilities for integration tests.
//!
//! Integration tests drive the real router through in-memory store
//! implementations, so they run hermetically without a database.

// Allow dead code in this module - these are helper utilities that may not be
// used by all integration tests but are intentionally available.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use fake::faker::company::en::CompanyName;
use fake::Fake;
use tower::ServiceExt;
use uuid::Uuid;

use domain::models::{NewPage, Page, PageUpdate, PlanName, SettingsPatch};
use domain::store::{PageStore, SettingsStore, StoreError};
use pagecraft_api::app::create_app;
use pagecraft_api::config::Config;

/// Plaintext admin token used by tests; its digest goes into the config.
pub const TEST_ADMIN_TOKEN: &str = "test-admin-token";

/// In-memory page store mirroring the repository semantics, including the
/// deterministic earliest-wins slug lookup and slug conflict on create.
#[derive(Default)]
pub struct MemoryPageStore {
    pages: RwLock<Vec<Page>>,
    pub fail: AtomicBool,
}

impl MemoryPageStore {
    pub fn with_pages(pages: Vec<Page>) -> Self {
        Self {
            pages: RwLock::new(pages),
            fail: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(StoreError::Backend("memory store failure".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PageStore for MemoryPageStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Page>, StoreError> {
        self.check()?;
        let pages = self.pages.read().unwrap();
        let mut matches: Vec<&Page> = pages.iter().filter(|p| p.slug == slug).collect();
        matches.sort_by_key(|p| (p.created_at, p.id));
        Ok(matches.first().map(|p| (*p).clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Page>, StoreError> {
        self.check()?;
        let pages = self.pages.read().unwrap();
        Ok(pages.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Page>, StoreError> {
        self.check()?;
        let pages = self.pages.read().unwrap();
        let mut owned: Vec<Page> = pages
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by_key(|p| std::cmp::Reverse((p.created_at, p.id)));
        Ok(owned)
    }

    async fn list_published(
        &self,
        limit: i64,
        after: Option<(DateTime<Utc>, Uuid)>,
    ) -> Result<Vec<Page>, StoreError> {
        self.check()?;
        let pages = self.pages.read().unwrap();
        let mut published: Vec<Page> = pages
            .iter()
            .filter(|p| p.published)
            .filter(|p| match after {
                Some(cursor) => (p.created_at, p.id) < cursor,
                None => true,
            })
            .cloned()
            .collect();
        published.sort_by_key(|p| std::cmp::Reverse((p.created_at, p.id)));
        published.truncate(limit as usize);
        Ok(published)
    }

    async fn create(&self, page: NewPage) -> Result<Page, StoreError> {
        self.check()?;
        let mut pages = self.pages.write().unwrap();
        if pages.iter().any(|p| p.slug == page.slug) {
            return Err(StoreError::SlugTaken(page.slug));
        }
        let now = Utc::now();
        let created = Page {
            id: Uuid::new_v4(),
            slug: page.slug,
            title: page.title,
            meta_description: page.meta_description,
            seo_title: page.seo_title,
            og_image: page.og_image,
            html: page.html,
            owner_id: page.owner_id,
            published: page.published,
            is_paid: page.is_paid,
            purchase_date: page.purchase_date,
            expiry_date: page.expiry_date,
            plan_name: page.plan_name,
            created_at: now,
            updated_at: now,
            created_by: page.created_by,
            last_edited_by: None,
        };
        pages.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, update: PageUpdate) -> Result<Option<Page>, StoreError> {
        self.check()?;
        let mut pages = self.pages.write().unwrap();
        if pages
            .iter()
            .any(|p| p.id != id && p.slug == update.slug)
        {
            return Err(StoreError::SlugTaken(update.slug));
        }
        let Some(page) = pages.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        page.slug = update.slug;
        page.title = update.title;
        page.meta_description = update.meta_description;
        page.seo_title = update.seo_title;
        page.og_image = update.og_image;
        page.html = update.html;
        page.published = update.published;
        page.is_paid = update.is_paid;
        page.purchase_date = update.purchase_date;
        page.expiry_date = update.expiry_date;
        page.plan_name = update.plan_name;
        page.last_edited_by = update.last_edited_by;
        page.updated_at = Utc::now();
        Ok(Some(page.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.check()?;
        let mut pages = self.pages.write().unwrap();
        let before = pages.len();
        pages.retain(|p| p.id != id);
        Ok(pages.len() < before)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }
}

/// In-memory settings store.
#[derive(Default)]
pub struct MemorySettingsStore {
    patch: RwLock<Option<SettingsPatch>>,
}

impl MemorySettingsStore {
    pub fn with_patch(patch: SettingsPatch) -> Self {
        Self {
            patch: RwLock::new(Some(patch)),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get_global(&self) -> Result<Option<SettingsPatch>, StoreError> {
        Ok(self.patch.read().unwrap().clone())
    }

    async fn put_global(&self, patch: &SettingsPatch) -> Result<(), StoreError> {
        *self.patch.write().unwrap() = Some(patch.clone());
        Ok(())
    }
}

/// Test configuration with the admin API enabled.
pub fn test_config() -> Config {
    let digest = shared::crypto::sha256_hex(TEST_ADMIN_TOKEN);
    Config::load_for_test(&[
        ("database.url", "postgres://unused"),
        ("security.admin_token_sha256", digest.as_str()),
        ("renderer.lookup_timeout_ms", "1000"),
        ("renderer.settings_timeout_ms", "200"),
    ])
    .expect("Failed to load test config")
}

/// Builds the full application over in-memory stores.
pub fn test_app(store: Arc<MemoryPageStore>, settings: Arc<MemorySettingsStore>) -> Router {
    create_app(test_config(), store, settings)
}

/// A published, paid page fixture with a future expiry.
pub fn active_page(slug: &str, html: &str) -> Page {
    let now = Utc::now();
    Page {
        id: Uuid::new_v4(),
        slug: slug.to_string(),
        title: CompanyName().fake(),
        meta_description: Some("A local business page".into()),
        seo_title: None,
        og_image: None,
        html: html.to_string(),
        owner_id: Uuid::new_v4(),
        published: true,
        is_paid: true,
        purchase_date: Some(now - Duration::days(10)),
        expiry_date: Some(now + Duration::days(355)),
        plan_name: PlanName::Basic,
        created_at: now,
        updated_at: now,
        created_by: None,
        last_edited_by: None,
    }
}

/// Sends a GET and returns status plus body text.
pub async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

/// Sends a JSON request with optional bearer token.
pub async fn request_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("failed to build request");

    let response = app.clone().oneshot(request).await.expect("request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}
