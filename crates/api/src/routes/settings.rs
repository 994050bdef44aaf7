//! Global settings admin API routes.

use axum::{extract::State, Json};
use tracing::info;
use validator::Validate;

use domain::models::settings::{resolve_settings, PlatformSettings, UpdateSettingsRequest};

use crate::app::AppState;
use crate::error::ApiError;

/// GET /api/v1/admin/settings
///
/// Returns the fully resolved settings (stored document merged over
/// defaults), so the admin UI always sees effective values.
pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<PlatformSettings>, ApiError> {
    let fetched = state.settings_store.get_global().await?;
    Ok(Json(resolve_settings(fetched)))
}

/// PUT /api/v1/admin/settings
///
/// Replaces the stored settings document and returns the resolved result.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<PlatformSettings>, ApiError> {
    request.validate()?;

    let patch = request.into_patch();
    state.settings_store.put_global(&patch).await?;
    info!("Updated platform settings");

    Ok(Json(resolve_settings(Some(patch))))
}
