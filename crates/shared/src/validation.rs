//! Common validation utilities.

use validator::ValidationError;

/// Maximum slug length. Long enough for any reasonable business name,
/// short enough to keep URLs sane.
pub const MAX_SLUG_LENGTH: usize = 64;

/// Maximum title length.
pub const MAX_TITLE_LENGTH: usize = 120;

/// Maximum meta description length (search engines truncate around 160).
pub const MAX_META_DESCRIPTION_LENGTH: usize = 160;

/// Maximum stored HTML body size in bytes (1 MiB).
pub const MAX_HTML_BYTES: usize = 1_048_576;

lazy_static::lazy_static! {
    /// Slug format: lowercase letters, digits, and hyphens only.
    pub static ref SLUG_REGEX: regex::Regex =
        regex::Regex::new(r"^[a-z0-9-]+$").unwrap();
}

/// Top-level paths owned by the platform itself. A page slug equal to any of
/// these would be shadowed by (or would shadow) a reserved route, so they are
/// rejected at write time.
pub const RESERVED_SLUGS: &[&str] = &[
    "about",
    "admin",
    "api",
    "assets",
    "auth",
    "contact",
    "dashboard",
    "explore",
    "health",
    "home",
    "legal",
    "login",
    "logout",
    "metrics",
    "plans",
    "privacy",
    "signup",
    "static",
    "terms",
];

/// Returns true if the slug collides with a reserved top-level route.
pub fn is_reserved_slug(slug: &str) -> bool {
    RESERVED_SLUGS.contains(&slug)
}

/// Validates slug format: non-empty, at most [`MAX_SLUG_LENGTH`] characters,
/// lowercase letters, digits, and hyphens only.
pub fn validate_slug_format(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() || slug.len() > MAX_SLUG_LENGTH {
        let mut err = ValidationError::new("slug_length");
        err.message = Some("Slug must be 1-64 characters".into());
        return Err(err);
    }
    if !SLUG_REGEX.is_match(slug) {
        let mut err = ValidationError::new("slug_format");
        err.message =
            Some("Slug can only contain lowercase letters, numbers, and hyphens".into());
        return Err(err);
    }
    Ok(())
}

/// Validates a slug for page creation: format plus the reserved-word denylist.
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    validate_slug_format(slug)?;
    if is_reserved_slug(slug) {
        let mut err = ValidationError::new("slug_reserved");
        err.message = Some("This slug is reserved by the platform".into());
        return Err(err);
    }
    Ok(())
}

/// Validates that an HTML body fits within the storage limit.
pub fn validate_html_size(html: &str) -> Result<(), ValidationError> {
    if html.len() > MAX_HTML_BYTES {
        let mut err = ValidationError::new("html_too_large");
        err.message = Some("Page HTML exceeds the 1 MiB limit".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_slug_format_accepts_valid() {
        assert!(validate_slug_format("shop1").is_ok());
        assert!(validate_slug_format("my-business-2024").is_ok());
        assert!(validate_slug_format("a").is_ok());
        assert!(validate_slug_format("123").is_ok());
    }

    #[test]
    fn test_validate_slug_format_rejects_invalid() {
        assert!(validate_slug_format("").is_err());
        assert!(validate_slug_format("Shop").is_err());
        assert!(validate_slug_format("my shop").is_err());
        assert!(validate_slug_format("shop_1").is_err());
        assert!(validate_slug_format("café").is_err());
        assert!(validate_slug_format("a/b").is_err());
    }

    #[test]
    fn test_validate_slug_format_rejects_overlong() {
        let slug = "a".repeat(MAX_SLUG_LENGTH + 1);
        assert!(validate_slug_format(&slug).is_err());
        let slug = "a".repeat(MAX_SLUG_LENGTH);
        assert!(validate_slug_format(&slug).is_ok());
    }

    #[test]
    fn test_reserved_slugs_are_rejected() {
        for reserved in RESERVED_SLUGS {
            assert!(is_reserved_slug(reserved), "{reserved} should be reserved");
            assert!(validate_slug(reserved).is_err(), "{reserved} should fail");
        }
    }

    #[test]
    fn test_reserved_slug_error_code() {
        let err = validate_slug("admin").unwrap_err();
        assert_eq!(err.code, "slug_reserved");
    }

    #[test]
    fn test_non_reserved_slug_passes_full_validation() {
        assert!(validate_slug("adminstuff").is_ok());
        assert!(validate_slug("exploring").is_ok());
        assert!(validate_slug("shop1").is_ok());
    }

    #[test]
    fn test_reserved_list_is_sorted_and_lowercase() {
        let mut sorted = RESERVED_SLUGS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, RESERVED_SLUGS);
        for s in RESERVED_SLUGS {
            assert_eq!(*s, s.to_lowercase());
            assert!(validate_slug_format(s).is_ok());
        }
    }

    #[test]
    fn test_validate_html_size() {
        assert!(validate_html_size("<p>hello</p>").is_ok());
        let big = "a".repeat(MAX_HTML_BYTES + 1);
        assert!(validate_html_size(&big).is_err());
    }
}
