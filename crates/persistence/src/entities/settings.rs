//! Platform settings entity (database row mapping).

use domain::models::SettingsPatch;
use sqlx::FromRow;

/// Database row mapping for the singleton platform_settings table. Every
/// column is nullable; the domain layer merges over defaults.
#[derive(Debug, Clone, FromRow)]
pub struct PlatformSettingsEntity {
    pub notice_enabled: Option<bool>,
    pub notice_title: Option<String>,
    pub notice_message: Option<String>,
    pub notice_contact_phone: Option<String>,
    pub notice_contact_whatsapp: Option<String>,
    pub platform_name: Option<String>,
    pub platform_email: Option<String>,
    pub default_og_image: Option<String>,
}

impl PlatformSettingsEntity {
    pub fn into_domain(self) -> SettingsPatch {
        SettingsPatch {
            notice_enabled: self.notice_enabled,
            notice_title: self.notice_title,
            notice_message: self.notice_message,
            notice_contact_phone: self.notice_contact_phone,
            notice_contact_whatsapp: self.notice_contact_whatsapp,
            platform_name: self.platform_name,
            platform_email: self.platform_email,
            default_og_image: self.default_og_image,
        }
    }
}
