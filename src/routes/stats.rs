/**
 * Dashboard Stats Routes
 * Aggregate lead counters for the admin dashboard
 */
use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};

use crate::auth::require_auth;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::models::LeadStatus;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_leads: usize,
    pub new_leads: usize,
    pub contacted_leads: usize,
    pub converted_leads: usize,
}

/// GET /api/admin/stats
pub async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DashboardStats>, ApiError> {
    require_auth(&state, &headers).await?;

    let leads = state.store.all_leads().await;
    let count = |status: LeadStatus| leads.iter().filter(|l| l.status == status).count();

    Ok(Json(DashboardStats {
        total_leads: leads.len(),
        new_leads: count(LeadStatus::New),
        contacted_leads: count(LeadStatus::Contacted),
        converted_leads: count(LeadStatus::Converted),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::{LeadUpdate, NewLead};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn stats_router(state: AppState) -> Router {
        Router::new()
            .route("/api/admin/stats", get(dashboard))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_stats_counts_by_status() {
        let state = AppState::new();
        for _ in 0..3 {
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
                .await;
        }
        let leads = state.store.all_leads().await;
        state
            .store
            .update_lead(
                leads[0].id,
                LeadUpdate {
                    status: Some(LeadStatus::Contacted),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let token = state.sessions.create(Uuid::new_v4(), "admin").await;
        let res = stats_router(state)
            .oneshot(
                Request::get("/api/admin/stats")
                    .header(header::COOKIE, format!("agency_session={}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let stats: DashboardStats = serde_json::from_slice(&body).unwrap();
        assert_eq!(stats.total_leads, 3);
        assert_eq!(stats.new_leads, 2);
        assert_eq!(stats.contacted_leads, 1);
        assert_eq!(stats.converted_leads, 0);
    }

    #[tokio::test]
    async fn test_stats_requires_session() {
        let state = AppState::new();
        let res = stats_router(state)
            .oneshot(Request::get("/api/admin/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
