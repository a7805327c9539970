/**
 * Testimonial Routes
 * Public testimonials listing and admin management
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
use crate::store::models::{NewTestimonial, Testimonial, TestimonialUpdate};

/// GET /api/testimonials - Active testimonials, order ascending
pub async fn list_public(State(state): State<AppState>) -> Json<Vec<Testimonial>> {
    Json(state.store.all_testimonials(false).await)
}

/// GET /api/admin/testimonials
pub async fn list_all(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Testimonial>>, ApiError> {
    require_auth(&state, &headers).await?;
    Ok(Json(state.store.all_testimonials(true).await))
}

/// POST /api/admin/testimonials
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<NewTestimonial>,
) -> Result<impl IntoResponse, ApiError> {
    require_auth(&state, &headers).await?;

    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("Name is required"));
    }
    if payload.quote.trim().is_empty() {
        return Err(ApiError::validation("Quote is required"));
    }
    if let Some(rating) = payload.rating {
        if !(1..=5).contains(&rating) {
            return Err(ApiError::validation("Rating must be between 1 and 5"));
        }
    }

    let testimonial = state.store.insert_testimonial(payload).await;
    Ok((StatusCode::CREATED, Json(testimonial)))
}

/// PATCH /api/admin/testimonials/{id}
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(updates): Json<TestimonialUpdate>,
) -> Result<Json<Testimonial>, ApiError> {
    require_auth(&state, &headers).await?;
    let testimonial = state.store.update_testimonial(id, updates).await?;
    Ok(Json(testimonial))
}

/// DELETE /api/admin/testimonials/{id}
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    require_auth(&state, &headers).await?;
    state.store.delete_testimonial(id).await;
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

    fn testimonials_router(state: AppState) -> Router {
        Router::new()
            .route("/api/testimonials", get(list_public))
            .route("/api/admin/testimonials", get(list_all).post(create))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_create_defaults_rating_to_five() {
        let state = AppState::new();
        let token = state.sessions.create(Uuid::new_v4(), "admin").await;

        let res = testimonials_router(state)
            .oneshot(
                Request::post("/api/admin/testimonials")
                    .header("content-type", "application/json")
                    .header(header::COOKIE, format!("agency_session={}", token))
                    .body(Body::from(
                        json!({
                            "name": "Dana",
                            "role": "CEO",
                            "quote": "Great work",
                            "image": "/dana.png"
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
        let testimonial: Testimonial = serde_json::from_slice(&body).unwrap();
        assert_eq!(testimonial.rating, 5);
    }

    #[tokio::test]
    async fn test_create_rejects_out_of_range_rating() {
        let state = AppState::new();
        let token = state.sessions.create(Uuid::new_v4(), "admin").await;

        let res = testimonials_router(state)
            .oneshot(
                Request::post("/api/admin/testimonials")
                    .header("content-type", "application/json")
                    .header(header::COOKIE, format!("agency_session={}", token))
                    .body(Body::from(
                        json!({
                            "name": "Dana",
                            "role": "CEO",
                            "quote": "Great work",
                            "image": "/dana.png",
                            "rating": 9
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
