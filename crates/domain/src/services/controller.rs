//! Public view controller.
//!
//! Owns the lifecycle of a single page view: slug lookup, visibility
//! evaluation, render planning, and the unpaid notice. Every failure path
//! terminates in a defined outcome; nothing here propagates a raw backend
//! error to a visitor.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::timeout;

use crate::models::settings::{resolve_settings, PlatformSettings};
use crate::models::Page;
use crate::services::renderer::RenderPlan;
use crate::services::visibility::{evaluate, PageVisibility};
use crate::store::{PageStore, SettingsStore};

/// Why a page that may exist is not being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    /// Page exists but the author has not published it.
    NotPublished,
    /// Page exists but its subscription window has lapsed.
    Expired,
    /// The store failed; the visitor gets a generic retry message.
    StoreFailure,
    /// The lookup exceeded the application-level deadline.
    Timeout,
    /// Sanitization rejected the stored body; unsanitized content is never
    /// a fallback.
    RenderFailure,
}

/// Terminal result of one view activation.
#[derive(Debug)]
pub enum ViewOutcome {
    /// No page matches the slug.
    NotFound,
    /// A page may exist but is not shown.
    Unavailable(UnavailableReason),
    /// The page renders.
    Visible {
        page: Page,
        visibility: PageVisibility,
        plan: RenderPlan,
        /// Unpaid notice content, present at most once per activation.
        notice: Option<PlatformSettings>,
    },
    /// A newer activation superseded this one before it resolved; the
    /// result must be discarded, never displayed.
    Superseded,
}

/// Controller for public page views.
///
/// Rapid navigation between slugs is resolved by generation ticket: each
/// activation bumps the generation, and a lookup that resolves after a newer
/// activation began returns [`ViewOutcome::Superseded`]. The underlying store
/// call is not cancelled, its result is simply never committed.
pub struct ViewController {
    store: Arc<dyn PageStore>,
    settings: Arc<dyn SettingsStore>,
    lookup_timeout: Duration,
    settings_timeout: Duration,
    generation: AtomicU64,
}

impl ViewController {
    pub fn new(
        store: Arc<dyn PageStore>,
        settings: Arc<dyn SettingsStore>,
        lookup_timeout: Duration,
        settings_timeout: Duration,
    ) -> Self {
        Self {
            store,
            settings,
            lookup_timeout,
            settings_timeout,
            generation: AtomicU64::new(0),
        }
    }

    /// Runs the full state machine for one slug.
    pub async fn activate(&self, slug: &str) -> ViewOutcome {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let looked_up = timeout(self.lookup_timeout, self.store.find_by_slug(slug)).await;

        if self.generation.load(Ordering::SeqCst) != ticket {
            tracing::debug!(slug, "discarding stale lookup result");
            return ViewOutcome::Superseded;
        }

        let page = match looked_up {
            Err(_) => {
                tracing::warn!(slug, timeout_ms = self.lookup_timeout.as_millis() as u64, "page lookup timed out");
                return ViewOutcome::Unavailable(UnavailableReason::Timeout);
            }
            Ok(Err(err)) => {
                tracing::error!(slug, error = %err, "page lookup failed");
                return ViewOutcome::Unavailable(UnavailableReason::StoreFailure);
            }
            Ok(Ok(None)) => return ViewOutcome::NotFound,
            Ok(Ok(Some(page))) => page,
        };

        let visibility = evaluate(&page, Utc::now());
        match visibility {
            PageVisibility::NotPublished => {
                ViewOutcome::Unavailable(UnavailableReason::NotPublished)
            }
            PageVisibility::Expired => ViewOutcome::Unavailable(UnavailableReason::Expired),
            PageVisibility::UnpaidPreview | PageVisibility::Active => {
                let plan = match RenderPlan::build(&page.html) {
                    Ok(plan) => plan,
                    Err(err) => {
                        tracing::error!(slug, error = %err, "page body failed sanitization");
                        return ViewOutcome::Unavailable(UnavailableReason::RenderFailure);
                    }
                };
                let notice = if visibility == PageVisibility::UnpaidPreview {
                    self.resolve_notice().await
                } else {
                    None
                };
                ViewOutcome::Visible {
                    page,
                    visibility,
                    plan,
                    notice,
                }
            }
        }
    }

    /// Resolves notice settings for the unpaid gate. Settings failures never
    /// fail the page view; the hardcoded defaults step in.
    async fn resolve_notice(&self) -> Option<PlatformSettings> {
        let fetched = match timeout(self.settings_timeout, self.settings.get_global()).await {
            Ok(Ok(patch)) => patch,
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "settings read failed, using defaults");
                None
            }
            Err(_) => {
                tracing::warn!("settings read timed out, using defaults");
                None
            }
        };
        let resolved = resolve_settings(fetched);
        resolved.notice_enabled.then_some(resolved)
    }
}
