/**
 * Lead Routes
 * Admin lead management over the sales pipeline
 */
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use uuid::Uuid;

use crate::auth::require_auth;
use crate::error::ApiError;
use crate::routes::SuccessResponse;
use crate::state::AppState;
use crate::store::models::{Lead, LeadUpdate};

/// GET /api/admin/leads
/// All leads, newest first.
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Lead>>, ApiError> {
    require_auth(&state, &headers).await?;
    Ok(Json(state.store.all_leads().await))
}

/// PATCH /api/admin/leads/{id}
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(updates): Json<LeadUpdate>,
) -> Result<Json<Lead>, ApiError> {
    require_auth(&state, &headers).await?;
    let lead = state.store.update_lead(id, updates).await?;
    Ok(Json(lead))
}

/// DELETE /api/admin/leads/{id}
/// Forgiving: deleting an absent id still reports success.
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    require_auth(&state, &headers).await?;
    state.store.delete_lead(id).await;
    Ok(Json(SuccessResponse::ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::{LeadStatus, NewLead};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::routing::{get, patch};
    use axum::Router;
    use serde_json::json;
    use tower::ServiceExt;

    fn leads_router(state: AppState) -> Router {
        Router::new()
            .route("/api/admin/leads", get(list))
            .route("/api/admin/leads/{id}", patch(update).delete(delete))
            .with_state(state)
    }

    async fn session_cookie_for(state: &AppState) -> String {
        let token = state.sessions.create(Uuid::new_v4(), "admin").await;
        format!("agency_session={}", token)
    }

    async fn seed_lead(state: &AppState) -> Lead {
        state
            .store
            .insert_lead(NewLead {
                name: "Jo".to_string(),
                email: "jo@x.com".to_string(),
                phone: None,
                company: None,
                message: "hi".to_string(),
                source: None,
            })
            .await
    }

    #[tokio::test]
    async fn test_list_requires_session() {
        let state = AppState::new();
        let res = leads_router(state)
            .oneshot(Request::get("/api/admin/leads").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_update_lead_status() {
        let state = AppState::new();
        let lead = seed_lead(&state).await;
        let cookie = session_cookie_for(&state).await;

        let res = leads_router(state.clone())
            .oneshot(
                Request::patch(format!("/api/admin/leads/{}", lead.id))
                    .header("content-type", "application/json")
                    .header(header::COOKIE, &cookie)
                    .body(Body::from(json!({"status": "contacted"}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let stored = state.store.get_lead(lead.id).await.unwrap();
        assert_eq!(stored.status, LeadStatus::Contacted);
    }

    #[tokio::test]
    async fn test_update_missing_lead_is_404() {
        let state = AppState::new();
        let cookie = session_cookie_for(&state).await;

        let res = leads_router(state)
            .oneshot(
                Request::patch(format!("/api/admin/leads/{}", Uuid::new_v4()))
                    .header("content-type", "application/json")
                    .header(header::COOKIE, &cookie)
                    .body(Body::from(json!({"status": "closed"}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_missing_lead_still_succeeds() {
        let state = AppState::new();
        let cookie = session_cookie_for(&state).await;

        let res = leads_router(state)
            .oneshot(
                Request::delete(format!("/api/admin/leads/{}", Uuid::new_v4()))
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
