/**
 * Project Routes
 * Public portfolio listing and admin project management
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
use crate::store::models::{NewProject, Project, ProjectUpdate};

/// GET /api/projects - Active projects, order ascending
pub async fn list_public(State(state): State<AppState>) -> Json<Vec<Project>> {
    Json(state.store.all_projects(false).await)
}

/// GET /api/admin/projects - All projects including inactive
pub async fn list_all(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Project>>, ApiError> {
    require_auth(&state, &headers).await?;
    Ok(Json(state.store.all_projects(true).await))
}

/// POST /api/admin/projects
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<NewProject>,
) -> Result<impl IntoResponse, ApiError> {
    require_auth(&state, &headers).await?;

    if payload.title.trim().is_empty() {
        return Err(ApiError::validation("Title is required"));
    }
    if payload.description.trim().is_empty() {
        return Err(ApiError::validation("Description is required"));
    }
    if payload.category.trim().is_empty() {
        return Err(ApiError::validation("Category is required"));
    }
    if payload.image.trim().is_empty() {
        return Err(ApiError::validation("Image is required"));
    }

    let project = state.store.insert_project(payload).await;
    Ok((StatusCode::CREATED, Json(project)))
}

/// PATCH /api/admin/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(updates): Json<ProjectUpdate>,
) -> Result<Json<Project>, ApiError> {
    require_auth(&state, &headers).await?;
    let project = state.store.update_project(id, updates).await?;
    Ok(Json(project))
}

/// DELETE /api/admin/projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    require_auth(&state, &headers).await?;
    state.store.delete_project(id).await;
    Ok(Json(SuccessResponse::ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::routing::get;
    use axum::Router;
    use serde_json::json;
    use tower::ServiceExt;

    fn projects_router(state: AppState) -> Router {
        Router::new()
            .route("/api/projects", get(list_public))
            .route("/api/admin/projects", get(list_all).post(create))
            .route("/api/admin/projects/{id}", axum::routing::patch(update).delete(delete))
            .with_state(state)
    }

    async fn session_cookie_for(state: &AppState) -> String {
        let token = state.sessions.create(Uuid::new_v4(), "admin").await;
        format!("agency_session={}", token)
    }

    fn new_project(order: i32, active: bool) -> NewProject {
        NewProject {
            title: format!("P{}", order),
            description: "d".to_string(),
            category: "web".to_string(),
            image: "/img.png".to_string(),
            link: None,
            technologies: None,
            order: Some(order),
            featured: None,
            active: Some(active),
        }
    }

    #[tokio::test]
    async fn test_public_listing_filters_inactive_and_sorts() {
        let state = AppState::new();
        state.store.insert_project(new_project(2, true)).await;
        state.store.insert_project(new_project(1, false)).await;
        state.store.insert_project(new_project(0, true)).await;

        let res = projects_router(state.clone())
            .oneshot(Request::get("/api/projects").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let projects: Vec<Project> = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            projects.iter().map(|p| p.title.as_str()).collect::<Vec<_>>(),
            vec!["P0", "P2"]
        );

        // The admin view sees everything, still ordered.
        let cookie = session_cookie_for(&state).await;
        let res = projects_router(state)
            .oneshot(
                Request::get("/api/admin/projects")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let projects: Vec<Project> = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            projects.iter().map(|p| p.title.as_str()).collect::<Vec<_>>(),
            vec!["P0", "P1", "P2"]
        );
    }

    #[tokio::test]
    async fn test_create_rejects_empty_title() {
        let state = AppState::new();
        let cookie = session_cookie_for(&state).await;

        let res = projects_router(state)
            .oneshot(
                Request::post("/api/admin/projects")
                    .header("content-type", "application/json")
                    .header(header::COOKIE, &cookie)
                    .body(Body::from(
                        json!({
                            "title": " ",
                            "description": "d",
                            "category": "web",
                            "image": "/img.png"
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_deactivate_hides_from_public() {
        let state = AppState::new();
        let cookie = session_cookie_for(&state).await;
        let project = state.store.insert_project(new_project(0, true)).await;

        let res = projects_router(state.clone())
            .oneshot(
                Request::patch(format!("/api/admin/projects/{}", project.id))
                    .header("content-type", "application/json")
                    .header(header::COOKIE, &cookie)
                    .body(Body::from(json!({"active": false}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        assert!(state.store.all_projects(false).await.is_empty());
        assert_eq!(state.store.all_projects(true).await.len(), 1);
    }
}
