//! Gateway axum app: shared state and router assembly.

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use wayfarer_config::ModelRegistry;
use wayfarer_core::SessionStore;

use crate::client::AgentClient;
use crate::routes;

/// Shared state for every route handler. The Gateway is the only component
/// that owns a [`SessionStore`]; the Agent Service it talks to over
/// [`AgentClient`] is stateless per call.
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub models: Arc<ModelRegistry>,
    pub agent: AgentClient,
}

impl AppState {
    pub fn new(models: Arc<ModelRegistry>, agent: AgentClient) -> Self {
        Self { sessions: Arc::new(SessionStore::new()), models, agent }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/chat/stream", post(routes::chat::stream))
        .route("/api/session/new", post(routes::session::create))
        .route("/api/sessions", get(routes::session::list))
        .route("/api/session/:id", delete(routes::session::delete))
        .route("/api/session/:id/name", put(routes::session::rename))
        .route("/api/session/:id/model", put(routes::session::set_model).get(routes::session::get_model))
        .route("/api/clear/:id", post(routes::session::clear))
        .route("/api/models", get(routes::models::list))
        .route("/api/models/:id", get(routes::models::get))
        .route("/api/health", get(routes::health::health))
        .route("/api/ready", get(routes::health::ready))
        .route("/api/live", get(routes::health::live))
        .with_state(state)
}
