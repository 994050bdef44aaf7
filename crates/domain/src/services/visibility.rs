//! Page visibility evaluation.
//!
//! The single source of truth for whether a page is shown to the public.
//! The renderer, the explore listing, and the admin status badges all call
//! [`evaluate`]; nothing else may reimplement this decision.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Page;

/// Derived visibility status. Never stored; computed on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageVisibility {
    /// Author has not published (drafts included).
    NotPublished,
    /// The subscription window has lapsed. Hard cutoff.
    Expired,
    /// Published but the current period is unpaid; shown with a notice.
    UnpaidPreview,
    /// Published and paid.
    Active,
}

impl PageVisibility {
    /// Whether the page is rendered to the public at all.
    pub fn is_publicly_visible(self) -> bool {
        matches!(self, PageVisibility::UnpaidPreview | PageVisibility::Active)
    }
}

impl std::fmt::Display for PageVisibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageVisibility::NotPublished => write!(f, "not_published"),
            PageVisibility::Expired => write!(f, "expired"),
            PageVisibility::UnpaidPreview => write!(f, "unpaid_preview"),
            PageVisibility::Active => write!(f, "active"),
        }
    }
}

/// Evaluates a page's effective visibility at `now`.
///
/// Priority order:
/// 1. Unpublished pages are never visible.
/// 2. A lapsed expiry date wins over everything else, including `is_paid`.
/// 3. Unpaid pages render as a preview behind the notice gate.
/// 4. Otherwise the page is active.
pub fn evaluate(page: &Page, now: DateTime<Utc>) -> PageVisibility {
    if !page.published {
        return PageVisibility::NotPublished;
    }
    if let Some(expiry) = page.expiry_date {
        if expiry < now {
            return PageVisibility::Expired;
        }
    }
    if !page.is_paid {
        return PageVisibility::UnpaidPreview;
    }
    PageVisibility::Active
}
