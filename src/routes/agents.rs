/**
 * AI Agent Routes
 * Public agent catalog and admin management
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
use crate::store::models::{AiAgent, AiAgentUpdate, NewAiAgent};

/// GET /api/ai-agents - Active agents, order ascending
pub async fn list_public(State(state): State<AppState>) -> Json<Vec<AiAgent>> {
    Json(state.store.all_ai_agents(false).await)
}

/// GET /api/admin/ai-agents
pub async fn list_all(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<AiAgent>>, ApiError> {
    require_auth(&state, &headers).await?;
    Ok(Json(state.store.all_ai_agents(true).await))
}

/// POST /api/admin/ai-agents
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<NewAiAgent>,
) -> Result<impl IntoResponse, ApiError> {
    require_auth(&state, &headers).await?;

    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("Name is required"));
    }
    if payload.description.trim().is_empty() {
        return Err(ApiError::validation("Description is required"));
    }
    if payload.price.trim().is_empty() {
        return Err(ApiError::validation("Price is required"));
    }
    if payload.category.trim().is_empty() {
        return Err(ApiError::validation("Category is required"));
    }

    let agent = state.store.insert_ai_agent(payload).await;
    Ok((StatusCode::CREATED, Json(agent)))
}

/// PATCH /api/admin/ai-agents/{id}
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(updates): Json<AiAgentUpdate>,
) -> Result<Json<AiAgent>, ApiError> {
    require_auth(&state, &headers).await?;
    let agent = state.store.update_ai_agent(id, updates).await?;
    Ok(Json(agent))
}

/// DELETE /api/admin/ai-agents/{id}
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    require_auth(&state, &headers).await?;
    state.store.delete_ai_agent(id).await;
    Ok(Json(SuccessResponse::ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::PriceType;
    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::routing::get;
    use axum::Router;
    use serde_json::json;
    use tower::ServiceExt;

    fn agents_router(state: AppState) -> Router {
        Router::new()
            .route("/api/ai-agents", get(list_public))
            .route("/api/admin/ai-agents", get(list_all).post(create))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_create_defaults_price_type_and_lists() {
        let state = AppState::new();
        let token = state.sessions.create(Uuid::new_v4(), "admin").await;

        let res = agents_router(state.clone())
            .oneshot(
                Request::post("/api/admin/ai-agents")
                    .header("content-type", "application/json")
                    .header(header::COOKIE, format!("agency_session={}", token))
                    .body(Body::from(
                        json!({
                            "name": "Support Bot",
                            "description": "Answers tickets",
                            "icon": "bot",
                            "price": "499",
                            "category": "customer_service"
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);

        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let agent: AiAgent = serde_json::from_slice(&body).unwrap();
        assert_eq!(agent.price_type, PriceType::Monthly);
        assert!(agent.features.is_empty());
        assert!(agent.active);

        let res = agents_router(state)
            .oneshot(Request::get("/api/ai-agents").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let agents: Vec<AiAgent> = serde_json::from_slice(&body).unwrap();
        assert_eq!(agents.len(), 1);
    }

    #[tokio::test]
    async fn test_one_time_price_type_round_trips() {
        let state = AppState::new();
        let token = state.sessions.create(Uuid::new_v4(), "admin").await;

        let res = agents_router(state)
            .oneshot(
                Request::post("/api/admin/ai-agents")
                    .header("content-type", "application/json")
                    .header(header::COOKIE, format!("agency_session={}", token))
                    .body(Body::from(
                        json!({
                            "name": "Setup",
                            "description": "One-off integration",
                            "icon": "wrench",
                            "price": "1999",
                            "priceType": "one-time",
                            "category": "sales"
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let agent: AiAgent = serde_json::from_slice(&body).unwrap();
        assert_eq!(agent.price_type, PriceType::OneTime);
        assert!(serde_json::to_string(&agent).unwrap().contains("\"one-time\""));
    }

    #[tokio::test]
    async fn test_admin_listing_requires_session() {
        let state = AppState::new();
        let res = agents_router(state)
            .oneshot(
                Request::get("/api/admin/ai-agents")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
