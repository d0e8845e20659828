//! HTTP/SSE route handlers, one module per resource.

pub mod chat;
pub mod health;
pub mod models;
pub mod session;

use axum::Json;
use serde::Serialize;

/// Error body shape used across every route: `{success:false, error}`.
#[derive(Serialize)]
pub struct ApiError {
    pub success: bool,
    pub error: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Json<Self> {
        Json(Self { success: false, error: error.into() })
    }
}
