/**
 * Contact Routes
 * Public contact-form submission, stored as a lead
 */
use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::models::NewLead;

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

/// POST /api/contact
/// Validate the submission and store it as a new lead.
pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<NewLead>,
) -> Result<Json<ContactResponse>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("Name is required"));
    }
    if payload.email.trim().is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if !payload.email.contains('@') {
        return Err(ApiError::validation("Invalid email format"));
    }
    if payload.message.trim().is_empty() {
        return Err(ApiError::validation("Message is required"));
    }

    let lead = state.store.insert_lead(payload).await;
    tracing::info!(lead_id = %lead.id, source = %lead.source, "new lead received");

    Ok(Json(ContactResponse {
        success: true,
        message: "Thank you for your message! We'll get back to you soon.".to_string(),
    }))
}
