//! Sending a single `AgentResponse` as JSON, abstracted behind a trait so
//! the dispatch logic in [`crate::handler`] can be driven by a mock sender
//! in tests instead of a live WebSocket.

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use wayfarer_protocol::{AgentResponse, ErrorResponse};

#[async_trait]
pub(crate) trait ResponseSender: Send {
    async fn send(&mut self, response: AgentResponse) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

pub(crate) struct WebSocketSender<'a>(pub(crate) &'a mut WebSocket);

#[async_trait]
impl ResponseSender for WebSocketSender<'_> {
    async fn send(&mut self, response: AgentResponse) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let json = serde_json::to_string(&response).unwrap_or_else(|_| {
            serde_json::to_string(&AgentResponse::Error(ErrorResponse {
                id: None,
                error: "serialization error".to_string(),
            }))
            .unwrap()
        });
        self.0.send(Message::Text(json)).await?;
        Ok(())
    }
}
