//! Page repository for database operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{NewPage, Page, PageUpdate};
use domain::store::{PageStore, StoreError};

use crate::entities::PageEntity;
use crate::metrics::QueryTimer;

const PAGE_COLUMNS: &str = "id, slug, title, meta_description, seo_title, og_image, html, \
                            owner_id, published, is_paid, purchase_date, expiry_date, \
                            plan_name, created_at, updated_at, created_by, last_edited_by";

/// Repository for page-related database operations.
#[derive(Clone)]
pub struct PageRepository {
    pool: PgPool,
}

impl PageRepository {
    /// Creates a new PageRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get a page by slug.
    ///
    /// Ordered by creation so a racy duplicate slug still resolves to the
    /// earliest page, deterministically.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<PageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_page_by_slug");
        let result = sqlx::query_as::<_, PageEntity>(&format!(
            "SELECT {PAGE_COLUMNS} FROM pages WHERE slug = $1 ORDER BY created_at, id LIMIT 1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Get a page by id.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<PageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_page_by_id");
        let result = sqlx::query_as::<_, PageEntity>(&format!(
            "SELECT {PAGE_COLUMNS} FROM pages WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Get an owner's pages, newest first.
    pub async fn get_by_owner(&self, owner_id: Uuid) -> Result<Vec<PageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_pages_by_owner");
        let result = sqlx::query_as::<_, PageEntity>(&format!(
            "SELECT {PAGE_COLUMNS} FROM pages WHERE owner_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Get published pages, newest first, keyset-paginated on (created_at, id).
    pub async fn get_published(
        &self,
        limit: i64,
        after: Option<(DateTime<Utc>, Uuid)>,
    ) -> Result<Vec<PageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_published_pages");
        let result = match after {
            Some((created_at, id)) => {
                sqlx::query_as::<_, PageEntity>(&format!(
                    "SELECT {PAGE_COLUMNS} FROM pages \
                     WHERE published = TRUE AND (created_at, id) < ($2, $3) \
                     ORDER BY created_at DESC, id DESC LIMIT $1"
                ))
                .bind(limit)
                .bind(created_at)
                .bind(id)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, PageEntity>(&format!(
                    "SELECT {PAGE_COLUMNS} FROM pages WHERE published = TRUE \
                     ORDER BY created_at DESC, id DESC LIMIT $1"
                ))
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        };
        timer.record();
        result
    }

    /// Insert a page. The database assigns id and audit timestamps.
    pub async fn insert(&self, page: &NewPage) -> Result<PageEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_page");
        let result = sqlx::query_as::<_, PageEntity>(&format!(
            "INSERT INTO pages (slug, title, meta_description, seo_title, og_image, html, \
             owner_id, published, is_paid, purchase_date, expiry_date, plan_name, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {PAGE_COLUMNS}"
        ))
        .bind(&page.slug)
        .bind(&page.title)
        .bind(&page.meta_description)
        .bind(&page.seo_title)
        .bind(&page.og_image)
        .bind(&page.html)
        .bind(page.owner_id)
        .bind(page.published)
        .bind(page.is_paid)
        .bind(page.purchase_date)
        .bind(page.expiry_date)
        .bind(page.plan_name.to_string())
        .bind(page.created_by)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Replace a page's mutable fields.
    pub async fn replace(
        &self,
        id: Uuid,
        update: &PageUpdate,
    ) -> Result<Option<PageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("replace_page");
        let result = sqlx::query_as::<_, PageEntity>(&format!(
            "UPDATE pages SET slug = $2, title = $3, meta_description = $4, seo_title = $5, \
             og_image = $6, html = $7, published = $8, is_paid = $9, purchase_date = $10, \
             expiry_date = $11, plan_name = $12, last_edited_by = $13, updated_at = NOW() \
             WHERE id = $1 RETURNING {PAGE_COLUMNS}"
        ))
        .bind(id)
        .bind(&update.slug)
        .bind(&update.title)
        .bind(&update.meta_description)
        .bind(&update.seo_title)
        .bind(&update.og_image)
        .bind(&update.html)
        .bind(update.published)
        .bind(update.is_paid)
        .bind(update.purchase_date)
        .bind(update.expiry_date)
        .bind(update.plan_name.to_string())
        .bind(update.last_edited_by)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a page by id. Returns whether a row was removed.
    pub async fn remove(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_page");
        let result = sqlx::query("DELETE FROM pages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        result.map(|r| r.rows_affected() > 0)
    }
}

/// Maps a sqlx error to the domain store error, recognizing the unique
/// violation on the slug index (Postgres 23505).
fn map_store_error(err: sqlx::Error, slug: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            return StoreError::SlugTaken(slug.to_string());
        }
    }
    StoreError::Backend(err.to_string())
}

#[async_trait]
impl PageStore for PageRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Page>, StoreError> {
        self.get_by_slug(slug)
            .await
            .map(|entity| entity.map(PageEntity::into_domain))
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Page>, StoreError> {
        self.get_by_id(id)
            .await
            .map(|entity| entity.map(PageEntity::into_domain))
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Page>, StoreError> {
        self.get_by_owner(owner_id)
            .await
            .map(|entities| entities.into_iter().map(PageEntity::into_domain).collect())
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn list_published(
        &self,
        limit: i64,
        after: Option<(DateTime<Utc>, Uuid)>,
    ) -> Result<Vec<Page>, StoreError> {
        self.get_published(limit, after)
            .await
            .map(|entities| entities.into_iter().map(PageEntity::into_domain).collect())
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn create(&self, page: NewPage) -> Result<Page, StoreError> {
        self.insert(&page)
            .await
            .map(PageEntity::into_domain)
            .map_err(|e| map_store_error(e, &page.slug))
    }

    async fn update(&self, id: Uuid, update: PageUpdate) -> Result<Option<Page>, StoreError> {
        self.replace(id, &update)
            .await
            .map(|entity| entity.map(PageEntity::into_domain))
            .map_err(|e| map_store_error(e, &update.slug))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.remove(id)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}
