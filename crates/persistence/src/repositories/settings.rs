//! Platform settings repository for database operations.

use async_trait::async_trait;
use sqlx::PgPool;

use domain::models::SettingsPatch;
use domain::store::{SettingsStore, StoreError};

use crate::entities::PlatformSettingsEntity;
use crate::metrics::QueryTimer;

const SETTINGS_COLUMNS: &str = "notice_enabled, notice_title, notice_message, \
                                notice_contact_phone, notice_contact_whatsapp, \
                                platform_name, platform_email, default_og_image";

/// Repository for the singleton platform settings document.
#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the global settings row, if present.
    pub async fn get(&self) -> Result<Option<PlatformSettingsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_platform_settings");
        let result = sqlx::query_as::<_, PlatformSettingsEntity>(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM platform_settings WHERE id = TRUE"
        ))
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create or replace the global settings row.
    pub async fn upsert(&self, patch: &SettingsPatch) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("upsert_platform_settings");
        let result = sqlx::query(
            "INSERT INTO platform_settings (id, notice_enabled, notice_title, notice_message, \
             notice_contact_phone, notice_contact_whatsapp, platform_name, platform_email, \
             default_og_image) \
             VALUES (TRUE, $1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (id) DO UPDATE SET \
             notice_enabled = EXCLUDED.notice_enabled, \
             notice_title = EXCLUDED.notice_title, \
             notice_message = EXCLUDED.notice_message, \
             notice_contact_phone = EXCLUDED.notice_contact_phone, \
             notice_contact_whatsapp = EXCLUDED.notice_contact_whatsapp, \
             platform_name = EXCLUDED.platform_name, \
             platform_email = EXCLUDED.platform_email, \
             default_og_image = EXCLUDED.default_og_image, \
             updated_at = NOW()",
        )
        .bind(patch.notice_enabled)
        .bind(&patch.notice_title)
        .bind(&patch.notice_message)
        .bind(&patch.notice_contact_phone)
        .bind(&patch.notice_contact_whatsapp)
        .bind(&patch.platform_name)
        .bind(&patch.platform_email)
        .bind(&patch.default_og_image)
        .execute(&self.pool)
        .await;
        timer.record();
        result.map(|_| ())
    }
}

#[async_trait]
impl SettingsStore for SettingsRepository {
    async fn get_global(&self) -> Result<Option<SettingsPatch>, StoreError> {
        self.get()
            .await
            .map(|entity| entity.map(PlatformSettingsEntity::into_domain))
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn put_global(&self, patch: &SettingsPatch) -> Result<(), StoreError> {
        self.upsert(patch)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}
