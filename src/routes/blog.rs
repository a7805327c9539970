/**
 * Blog Routes
 * Public blog listings and admin CRUD for posts
 */
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use regex::Regex;
use uuid::Uuid;

use crate::auth::require_auth;
use crate::error::ApiError;
use crate::routes::SuccessResponse;
use crate::state::AppState;
use crate::store::models::{BlogPost, BlogPostUpdate, NewBlogPost, PostStatus};

// ============================================================================
// Validation
// ============================================================================

lazy_static::lazy_static! {
    /// Valid slug pattern: lowercase letters, numbers, and hyphens
    static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

fn is_valid_slug(slug: &str) -> bool {
    SLUG_REGEX.is_match(slug)
}

/// Sanitize HTML content using ammonia
fn sanitize_html(html: &str) -> String {
    ammonia::clean(html)
}

fn validate_slug(slug: &str) -> Result<(), ApiError> {
    if !is_valid_slug(slug) {
        return Err(ApiError::validation(
            "Slug must contain only lowercase letters, numbers, and hyphens",
        ));
    }
    Ok(())
}

// ============================================================================
// Public handlers
// ============================================================================

/// GET /api/blog-posts - Published posts, newest first
pub async fn list_published(State(state): State<AppState>) -> Json<Vec<BlogPost>> {
    Json(state.store.all_blog_posts(false).await)
}

/// GET /api/blog-posts/{slug} - Single published post by slug
pub async fn get_published(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, ApiError> {
    validate_slug(&slug)?;

    let post = state
        .store
        .get_blog_post_by_slug(&slug)
        .await
        // Drafts are invisible to the public site.
        .filter(|p| p.status == PostStatus::Published)
        .ok_or(ApiError::NotFound("Blog post"))?;

    Ok(Json(post))
}

// ============================================================================
// Admin handlers
// ============================================================================

/// GET /api/admin/blog-posts - All posts including drafts
pub async fn list_all(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<BlogPost>>, ApiError> {
    require_auth(&state, &headers).await?;
    Ok(Json(state.store.all_blog_posts(true).await))
}

/// GET /api/admin/blog-posts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<BlogPost>, ApiError> {
    require_auth(&state, &headers).await?;
    let post = state
        .store
        .get_blog_post(id)
        .await
        .ok_or(ApiError::NotFound("Blog post"))?;
    Ok(Json(post))
}

/// POST /api/admin/blog-posts
/// The author is the logged-in user, never the payload.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut payload): Json<NewBlogPost>,
) -> Result<impl IntoResponse, ApiError> {
    let session = require_auth(&state, &headers).await?;

    if payload.title.trim().is_empty() {
        return Err(ApiError::validation("Title is required"));
    }
    if payload.content.trim().is_empty() {
        return Err(ApiError::validation("Content is required"));
    }
    validate_slug(&payload.slug)?;

    // Slug uniqueness is a route-layer convention: look up before insert.
    if state
        .store
        .get_blog_post_by_slug(&payload.slug)
        .await
        .is_some()
    {
        return Err(ApiError::Conflict("Slug already exists".to_string()));
    }

    payload.content = sanitize_html(&payload.content);

    let post = state.store.insert_blog_post(payload, session.user_id).await;
    Ok((StatusCode::CREATED, Json(post)))
}

/// PATCH /api/admin/blog-posts/{id}
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(mut updates): Json<BlogPostUpdate>,
) -> Result<Json<BlogPost>, ApiError> {
    require_auth(&state, &headers).await?;

    if let Some(ref slug) = updates.slug {
        validate_slug(slug)?;
        if let Some(existing) = state.store.get_blog_post_by_slug(slug).await {
            if existing.id != id {
                return Err(ApiError::Conflict("Slug already exists".to_string()));
            }
        }
    }
    if let Some(content) = updates.content.take() {
        updates.content = Some(sanitize_html(&content));
    }

    let post = state.store.update_blog_post(id, updates).await?;
    Ok(Json(post))
}

/// DELETE /api/admin/blog-posts/{id}
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    require_auth(&state, &headers).await?;
    state.store.delete_blog_post(id).await;
    Ok(Json(SuccessResponse::ok()))
}
