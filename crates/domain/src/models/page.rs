//! Page domain models.
//!
//! A page is the central entity of the platform: an HTML document owned by a
//! business, published at a slug-based URL, with a manually tracked
//! subscription window gating its public visibility.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::services::visibility::PageVisibility;

/// Subscription plan attached to a page. Informational only; visibility is
/// governed by the paid flag and the subscription window, not the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanName {
    Basic,
    Standard,
    Custom,
}

impl Default for PlanName {
    fn default() -> Self {
        PlanName::Basic
    }
}

impl std::fmt::Display for PlanName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanName::Basic => write!(f, "basic"),
            PlanName::Standard => write!(f, "standard"),
            PlanName::Custom => write!(f, "custom"),
        }
    }
}

impl std::str::FromStr for PlanName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(PlanName::Basic),
            "standard" => Ok(PlanName::Standard),
            "custom" => Ok(PlanName::Custom),
            _ => Err(()),
        }
    }
}

/// A stored page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: Uuid,
    /// Unique URL-safe public lookup key.
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    /// Untrusted content body: a full HTML document or a fragment.
    pub html: String,
    /// The business/user this page belongs to.
    pub owner_id: Uuid,
    /// Author intent to make the page visible.
    pub published: bool,
    /// Whether the current subscription period is marked paid.
    pub is_paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
    pub plan_name: PlanName,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_edited_by: Option<Uuid>,
}

/// Values for creating a page. The store assigns id and audit timestamps.
#[derive(Debug, Clone)]
pub struct NewPage {
    pub slug: String,
    pub title: String,
    pub meta_description: Option<String>,
    pub seo_title: Option<String>,
    pub og_image: Option<String>,
    pub html: String,
    pub owner_id: Uuid,
    pub published: bool,
    pub is_paid: bool,
    pub purchase_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub plan_name: PlanName,
    pub created_by: Option<Uuid>,
}

/// Complete replacement values for updating a page. Handlers load the current
/// page, merge the request into it, and write the merged result back.
#[derive(Debug, Clone)]
pub struct PageUpdate {
    pub slug: String,
    pub title: String,
    pub meta_description: Option<String>,
    pub seo_title: Option<String>,
    pub og_image: Option<String>,
    pub html: String,
    pub published: bool,
    pub is_paid: bool,
    pub purchase_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub plan_name: PlanName,
    pub last_edited_by: Option<Uuid>,
}

/// Request to create a page.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePageRequest {
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,

    #[validate(length(min = 1, max = 120, message = "Title must be 1-120 characters"))]
    pub title: String,

    #[validate(length(max = 160, message = "Meta description must be at most 160 characters"))]
    pub meta_description: Option<String>,

    #[validate(length(max = 120, message = "SEO title must be at most 120 characters"))]
    pub seo_title: Option<String>,

    #[validate(url(message = "OG image must be a valid URL"))]
    pub og_image: Option<String>,

    #[validate(custom(function = "validate_html"))]
    pub html: String,

    pub owner_id: Uuid,

    #[serde(default)]
    pub published: bool,

    #[serde(default)]
    pub is_paid: bool,

    pub purchase_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub plan_name: PlanName,
}

/// Request to update a page. Absent fields keep their current values;
/// the nullable dates are cleared via the explicit flags.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePageRequest {
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,

    #[validate(length(min = 1, max = 120, message = "Title must be 1-120 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 160, message = "Meta description must be at most 160 characters"))]
    pub meta_description: Option<String>,

    #[validate(length(max = 120, message = "SEO title must be at most 120 characters"))]
    pub seo_title: Option<String>,

    #[validate(url(message = "OG image must be a valid URL"))]
    pub og_image: Option<String>,

    #[validate(custom(function = "validate_html"))]
    pub html: Option<String>,

    pub published: Option<bool>,
    pub is_paid: Option<bool>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub plan_name: Option<PlanName>,

    #[serde(default)]
    pub clear_purchase_date: bool,
    #[serde(default)]
    pub clear_expiry_date: bool,
}

/// Full page response for the admin API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    pub html: String,
    pub owner_id: Uuid,
    pub published: bool,
    pub is_paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
    pub plan_name: PlanName,
    /// Derived visibility status at response time.
    pub status: PageVisibility,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PageResponse {
    pub fn from_page(page: Page, status: PageVisibility) -> Self {
        Self {
            id: page.id,
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
            status,
            created_at: page.created_at,
            updated_at: page.updated_at,
        }
    }
}

/// Listing summary: everything but the HTML body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    pub plan_name: PlanName,
    pub status: PageVisibility,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
}

impl PageSummary {
    pub fn from_page(page: &Page, status: PageVisibility) -> Self {
        Self {
            id: page.id,
            slug: page.slug.clone(),
            title: page.title.clone(),
            meta_description: page.meta_description.clone(),
            og_image: page.og_image.clone(),
            plan_name: page.plan_name,
            status,
            created_at: page.created_at,
            expiry_date: page.expiry_date,
        }
    }
}

fn validate_slug(slug: &str) -> Result<(), validator::ValidationError> {
    shared::validation::validate_slug(slug)
}

fn validate_html(html: &str) -> Result<(), validator::ValidationError> {
    shared::validation::validate_html_size(html)
}
