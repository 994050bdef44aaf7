//! Global platform settings.
//!
//! A single document holding platform-wide notice copy and contact details.
//! The public renderer must keep working when the document is missing, so
//! every read goes through [`resolve_settings`], a pure merge over hardcoded
//! defaults.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Fully resolved platform settings. Every field has a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSettings {
    /// Whether the unpaid-preview notice overlay is shown at all.
    pub notice_enabled: bool,
    pub notice_title: String,
    pub notice_message: String,
    pub notice_contact_phone: String,
    pub notice_contact_whatsapp: String,
    pub platform_name: String,
    pub platform_email: String,
    pub default_og_image: String,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            notice_enabled: true,
            notice_title: "Page Payment Required".to_string(),
            notice_message: "This page is published but payment is pending. \
                             Contact us to complete your subscription."
                .to_string(),
            notice_contact_phone: "+91-9999999999".to_string(),
            notice_contact_whatsapp: "919999999999".to_string(),
            platform_name: "Pagecraft".to_string(),
            platform_email: "hello@pagecraft.app".to_string(),
            default_og_image: String::new(),
        }
    }
}

/// The stored settings document: every field optional so a partially filled
/// document (or none at all) still resolves cleanly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub notice_enabled: Option<bool>,
    pub notice_title: Option<String>,
    pub notice_message: Option<String>,
    pub notice_contact_phone: Option<String>,
    pub notice_contact_whatsapp: Option<String>,
    pub platform_name: Option<String>,
    pub platform_email: Option<String>,
    pub default_og_image: Option<String>,
}

/// Request to update the global settings document.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub notice_enabled: Option<bool>,

    #[validate(length(max = 120, message = "Notice title must be at most 120 characters"))]
    pub notice_title: Option<String>,

    #[validate(length(max = 1000, message = "Notice message must be at most 1000 characters"))]
    pub notice_message: Option<String>,

    #[validate(length(max = 32, message = "Phone number must be at most 32 characters"))]
    pub notice_contact_phone: Option<String>,

    #[validate(length(max = 32, message = "WhatsApp number must be at most 32 characters"))]
    pub notice_contact_whatsapp: Option<String>,

    #[validate(length(max = 120, message = "Platform name must be at most 120 characters"))]
    pub platform_name: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub platform_email: Option<String>,

    #[validate(url(message = "Default OG image must be a valid URL"))]
    pub default_og_image: Option<String>,
}

impl UpdateSettingsRequest {
    /// Converts the request into a storable patch.
    pub fn into_patch(self) -> SettingsPatch {
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

/// Resolves the stored settings document against hardcoded defaults.
///
/// `None` (document missing or unreadable) yields the defaults unchanged, so
/// the notice gate can always render.
pub fn resolve_settings(fetched: Option<SettingsPatch>) -> PlatformSettings {
    let defaults = PlatformSettings::default();
    let Some(patch) = fetched else {
        return defaults;
    };

    PlatformSettings {
        notice_enabled: patch.notice_enabled.unwrap_or(defaults.notice_enabled),
        notice_title: patch.notice_title.unwrap_or(defaults.notice_title),
        notice_message: patch.notice_message.unwrap_or(defaults.notice_message),
        notice_contact_phone: patch
            .notice_contact_phone
            .unwrap_or(defaults.notice_contact_phone),
        notice_contact_whatsapp: patch
            .notice_contact_whatsapp
            .unwrap_or(defaults.notice_contact_whatsapp),
        platform_name: patch.platform_name.unwrap_or(defaults.platform_name),
        platform_email: patch.platform_email.unwrap_or(defaults.platform_email),
        default_og_image: patch.default_og_image.unwrap_or(defaults.default_og_image),
    }
}
