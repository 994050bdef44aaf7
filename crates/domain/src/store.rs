//! Store contracts consumed by the renderer and the admin surface.
//!
//! The platform treats its backing database as a generic keyed collection
//! with query-by-field capability. These traits are that contract; the
//! `persistence` crate provides the PostgreSQL implementation and tests
//! provide in-memory ones.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{NewPage, Page, PageUpdate, SettingsPatch};

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The slug is already taken by another page.
    #[error("Slug '{0}' is already taken")]
    SlugTaken(String),

    /// Backend failure (connectivity, query, mapping). The message is for
    /// logs only and must never reach a visitor.
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Page collection contract.
///
/// The public renderer only consumes [`find_by_slug`](PageStore::find_by_slug)
/// and [`ping`](PageStore::ping); the remaining operations serve the admin
/// surface and listings.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Looks up a page by its public slug.
    ///
    /// If duplicate slugs ever exist (the create-time check races), the
    /// earliest-created page wins, deterministically.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Page>, StoreError>;

    /// Fetches a page by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Page>, StoreError>;

    /// Lists an owner's pages, newest first.
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Page>, StoreError>;

    /// Lists published pages for the public explore surface, newest first,
    /// keyset-paginated on `(created_at, id)`.
    async fn list_published(
        &self,
        limit: i64,
        after: Option<(DateTime<Utc>, Uuid)>,
    ) -> Result<Vec<Page>, StoreError>;

    /// Creates a page. Returns [`StoreError::SlugTaken`] on slug conflict.
    async fn create(&self, page: NewPage) -> Result<Page, StoreError>;

    /// Replaces a page's mutable fields. Returns the updated page, or `None`
    /// if no page with that id exists.
    async fn update(&self, id: Uuid, update: PageUpdate) -> Result<Option<Page>, StoreError>;

    /// Deletes a page. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Cheap connectivity probe for health checks.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Global settings document contract.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Fetches the global settings document, if present.
    async fn get_global(&self) -> Result<Option<SettingsPatch>, StoreError>;

    /// Creates or replaces the global settings document.
    async fn put_global(&self, patch: &SettingsPatch) -> Result<(), StoreError>;
}
