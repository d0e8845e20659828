//! Axum app: state, router, and WebSocket upgrade handler.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{ws::WebSocketUpgrade, State},
    response::Response,
    routing::get,
    Router,
};
use tokio::sync::oneshot;
use wayfarer_config::ModelRegistry;
use wayfarer_core::{ReactConfig, ToolRegistry};

use crate::connection::handle_socket;
use crate::handler::Handler;

/// When set, the first WebSocket connection to close sends on this to
/// signal server exit (once mode, used by tests).
pub(crate) struct AppState {
    pub(crate) handler: Handler,
    pub(crate) shutdown_tx: Mutex<Option<oneshot::Sender<()>>>,
}

impl AppState {
    pub(crate) fn new(
        tools: Arc<ToolRegistry>,
        models: Arc<ModelRegistry>,
        react_config: ReactConfig,
        shutdown_tx: Option<oneshot::Sender<()>>,
    ) -> Self {
        Self { handler: Handler::new(tools, models, react_config), shutdown_tx: Mutex::new(shutdown_tx) }
    }
}

pub(crate) fn router(state: Arc<AppState>) -> Router {
    Router::new().route("/", get(ws_handler)).with_state(state)
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    let shutdown_tx = state.shutdown_tx.lock().ok().and_then(|mut guard| guard.take());
    ws.on_upgrade(move |socket| async move {
        handle_socket(socket, &state.handler, shutdown_tx).await;
    })
}
