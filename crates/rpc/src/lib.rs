//! Agent Service: the stateless WebSocket RPC surface over the ReAct
//! orchestration engine. Listens on ws://127.0.0.1:9090, handles
//! `process_message`, `stream_message`, `health_check`.
//!
//! **Public API**: [`run_serve`], [`run_serve_on_listener`].

mod app;
mod connection;
mod handler;
mod llm_factory;
mod response;

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::info;
use wayfarer_config::ModelRegistry;
use wayfarer_core::{ReactConfig, ToolRegistry};

use app::{router, AppState};

const DEFAULT_ADDR: &str = "127.0.0.1:9090";

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("bind {addr}: {source}")]
    Bind { addr: String, source: std::io::Error },
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Runs the Agent Service on an existing listener. Used by tests (bind to
/// 127.0.0.1:0, then pass the listener in). When `once` is true, accepts
/// one connection, handles it, then returns.
pub async fn run_serve_on_listener(
    listener: TcpListener,
    tools: Arc<ToolRegistry>,
    models: Arc<ModelRegistry>,
    react_config: ReactConfig,
    once: bool,
) -> Result<(), ServeError> {
    let addr = listener.local_addr().map_err(ServeError::Server)?;
    info!("Agent Service listening on ws://{}", addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let state = Arc::new(AppState::new(tools, models, react_config, once.then_some(shutdown_tx)));
    let app = router(state);

    if once {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await?;
    } else {
        axum::serve(listener, app).await?;
    }
    Ok(())
}

/// Runs the Agent Service, binding `addr` (default `127.0.0.1:9090`).
pub async fn run_serve(
    addr: Option<&str>,
    tools: Arc<ToolRegistry>,
    models: Arc<ModelRegistry>,
    react_config: ReactConfig,
) -> Result<(), ServeError> {
    let addr = addr.unwrap_or(DEFAULT_ADDR);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { addr: addr.to_string(), source })?;
    run_serve_on_listener(listener, tools, models, react_config, false).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::{connect_async, tungstenite::Message};
    use wayfarer_core::tool::builtin;
    use wayfarer_protocol::{AgentRequest, AgentResponse, HealthCheckRequest};

    #[tokio::test]
    async fn health_check_round_trip_over_websocket() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let mut registry = ToolRegistry::new();
        builtin::register_all(&mut registry);
        let tools = Arc::new(registry);
        let models = Arc::new(ModelRegistry::default());

        tokio::spawn(run_serve_on_listener(listener, tools, models, ReactConfig::default(), true));

        // give the listener a beat to start accepting.
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        let (ws, _) = connect_async(format!("ws://{addr}")).await.unwrap();
        let (mut write, mut read) = ws.split();

        let req = AgentRequest::HealthCheck(HealthCheckRequest {});
        write.send(Message::Text(serde_json::to_string(&req).unwrap().into())).await.unwrap();

        let response = read.next().await.unwrap().unwrap();
        let parsed: AgentResponse = serde_json::from_str(response.to_text().unwrap()).unwrap();
        match parsed {
            AgentResponse::HealthCheck(health) => assert!(health.alive),
            other => panic!("expected health check response, got {other:?}"),
        }
    }
}
