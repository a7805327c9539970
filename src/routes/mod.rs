/**
 * Routes Module
 * API route handlers
 */

pub mod agents;
pub mod auth;
pub mod blog;
pub mod contact;
pub mod health;
pub mod leads;
pub mod projects;
pub mod services;
pub mod settings;
pub mod stats;
pub mod testimonials;

use serde::Serialize;

/// Success response for deletes and other side-effect-only endpoints.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
