//! WebSocket connection lifecycle: recv loop and request dispatch.

use axum::extract::ws::{Message, WebSocket};
use tokio::sync::oneshot;
use uuid::Uuid;
use wayfarer_protocol::{AgentRequest, AgentResponse, ErrorResponse, HealthCheckResponse};

use crate::handler::Handler;
use crate::response::{ResponseSender, WebSocketSender};

pub(crate) async fn handle_socket(mut socket: WebSocket, handler: &Handler, shutdown_tx: Option<oneshot::Sender<()>>) {
    while let Some(received) = socket.recv().await {
        let message = match received {
            Ok(m) => m,
            Err(error) => {
                tracing::warn!("read error (client closed?): {}", error);
                let _ = socket.close().await;
                break;
            }
        };
        let text = match &message {
            Message::Text(t) => t.clone(),
            Message::Binary(b) => String::from_utf8_lossy(b).into_owned(),
            Message::Close(_) => break,
            _ => continue,
        };

        if let Err(error) = dispatch_request(&text, &mut socket, handler).await {
            tracing::warn!("request handling error: {}", error);
            let _ = socket.close().await;
            break;
        }
    }
    if let Some(tx) = shutdown_tx {
        let _ = tx.send(());
    }
}

async fn dispatch_request(
    text: &str,
    socket: &mut WebSocket,
    handler: &Handler,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let request: AgentRequest = match serde_json::from_str(text) {
        Ok(r) => r,
        Err(error) => {
            let mut sender = WebSocketSender(socket);
            return sender
                .send(AgentResponse::Error(ErrorResponse { id: None, error: format!("parse error: {error}") }))
                .await;
        }
    };

    let mut sender = WebSocketSender(socket);
    match request {
        AgentRequest::ProcessMessage(req) => {
            let id = Uuid::new_v4().to_string();
            let response = handler.process_message(req).await;
            sender.send(AgentResponse::MessageResponse { id, response }).await
        }
        AgentRequest::StreamMessage(req) => {
            let id = Uuid::new_v4().to_string();
            handler.stream_message(id, req, &mut sender).await
        }
        AgentRequest::HealthCheck(_) => {
            sender
                .send(AgentResponse::HealthCheck(HealthCheckResponse {
                    alive: true,
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    status: "ok".to_string(),
                }))
                .await
        }
    }
}
