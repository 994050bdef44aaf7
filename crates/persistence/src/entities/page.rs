//! Page entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Page, PlanName};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the pages table.
#[derive(Debug, Clone, FromRow)]
pub struct PageEntity {
    pub id: Uuid,
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
    pub plan_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub last_edited_by: Option<Uuid>,
}

impl PageEntity {
    /// Converts the row into the domain model. Unknown plan names map to
    /// `Custom` so a widened plan column never breaks reads.
    pub fn into_domain(self) -> Page {
        let plan_name = self.plan_name.parse().unwrap_or(PlanName::Custom);
        Page {
            id: self.id,
            slug: self.slug,
            title: self.title,
            meta_description: self.meta_description,
            seo_title: self.seo_title,
            og_image: self.og_image,
            html: self.html,
            owner_id: self.owner_id,
            published: self.published,
            is_paid: self.is_paid,
            purchase_date: self.purchase_date,
            expiry_date: self.expiry_date,
            plan_name,
            created_at: self.created_at,
            updated_at: self.updated_at,
            created_by: self.created_by,
            last_edited_by: self.last_edited_by,
        }
    }
}
