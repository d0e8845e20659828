//! Gateway Service: the browser-facing HTTP/SSE surface. Owns the
//! [`wayfarer_core::SessionStore`] and translates it, via [`AgentClient`],
//! onto the stateless Agent Service's WebSocket RPC.

mod app;
mod client;
mod routes;
mod sse;

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;
use wayfarer_config::ModelRegistry;

pub use app::AppState;
pub use client::{AgentClient, ClientError};

const DEFAULT_ADDR: &str = "127.0.0.1:8081";

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("bind {addr}: {source}")]
    Bind { addr: String, source: std::io::Error },
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

pub async fn run_serve_on_listener(
    listener: TcpListener,
    models: Arc<ModelRegistry>,
    agent_url: &str,
) -> Result<(), ServeError> {
    let addr = listener.local_addr().map_err(ServeError::Server)?;
    info!("Gateway listening on http://{}", addr);

    let state = Arc::new(AppState::new(models, AgentClient::new(agent_url)));
    axum::serve(listener, app::router(state)).await?;
    Ok(())
}

pub async fn run_serve(
    addr: Option<&str>,
    models: Arc<ModelRegistry>,
    agent_url: &str,
) -> Result<(), ServeError> {
    let addr = addr.unwrap_or(DEFAULT_ADDR);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { addr: addr.to_string(), source })?;
    run_serve_on_listener(listener, models, agent_url).await
}
