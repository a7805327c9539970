/**
 * Service Routes
 * Public services listing and admin management
 */
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::auth::require_auth;
use crate::error::ApiError;
use crate::routes::SuccessResponse;
use crate::state::AppState;
use crate::store::models::{NewService, Service, ServiceUpdate};

/// GET /api/services - Active services, order ascending
pub async fn list_public(State(state): State<AppState>) -> Json<Vec<Service>> {
    Json(state.store.all_services(false).await)
}

/// GET /api/admin/services
pub async fn list_all(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Service>>, ApiError> {
    require_auth(&state, &headers).await?;
    Ok(Json(state.store.all_services(true).await))
}

/// POST /api/admin/services
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<NewService>,
) -> Result<impl IntoResponse, ApiError> {
    require_auth(&state, &headers).await?;

    if payload.title.trim().is_empty() {
        return Err(ApiError::validation("Title is required"));
    }
    if payload.description.trim().is_empty() {
        return Err(ApiError::validation("Description is required"));
    }
    if payload.price.trim().is_empty() {
        return Err(ApiError::validation("Price is required"));
    }

    let service = state.store.insert_service(payload).await;
    Ok((StatusCode::CREATED, Json(service)))
}

/// PATCH /api/admin/services/{id}
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(updates): Json<ServiceUpdate>,
) -> Result<Json<Service>, ApiError> {
    require_auth(&state, &headers).await?;
    let service = state.store.update_service(id, updates).await?;
    Ok(Json(service))
}

/// DELETE /api/admin/services/{id}
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    require_auth(&state, &headers).await?;
    state.store.delete_service(id).await;
    Ok(Json(SuccessResponse::ok()))
}
