/**
 * Site Settings Routes
 * Keyed JSON settings: public point lookup, admin upsert
 */
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::auth::require_auth;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::models::SiteSetting;

#[derive(Debug, Deserialize)]
pub struct SetSettingRequest {
    pub value: Value,
}

/// GET /api/settings/{key}
/// Public lookup of a single setting (hero copy, social links, ...).
pub async fn get_by_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<SiteSetting>, ApiError> {
    let setting = state
        .store
        .get_setting(&key)
        .await
        .ok_or(ApiError::NotFound("Setting"))?;
    Ok(Json(setting))
}

/// GET /api/admin/settings
pub async fn list_all(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<SiteSetting>>, ApiError> {
    require_auth(&state, &headers).await?;
    Ok(Json(state.store.all_settings().await))
}

/// PUT /api/admin/settings/{key}
/// Upsert: first write creates the record, later writes update value and
/// timestamp in place.
pub async fn upsert(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
    Json(payload): Json<SetSettingRequest>,
) -> Result<Json<SiteSetting>, ApiError> {
    require_auth(&state, &headers).await?;

    if key.trim().is_empty() {
        return Err(ApiError::validation("Setting key is required"));
    }

    let setting = state.store.set_setting(&key, payload.value).await;
    tracing::debug!(key = %setting.key, "site setting updated");
    Ok(Json(setting))
}
