//! `AgentClient`: WebSocket client to the Agent Service, used by every
//! route handler instead of holding orchestration state directly.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use wayfarer_protocol::{AgentRequest, AgentResponse, HealthCheckRequest, HealthCheckResponse, MessageRequest, MessageResponse, StreamChunk};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const READ_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("connect timeout contacting agent service")]
    ConnectTimeout,
    #[error("read timeout waiting for agent service")]
    ReadTimeout,
    #[error("agent service connection: {0}")]
    Connection(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("malformed agent service frame: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("agent service reported an error: {0}")]
    Remote(String),
    #[error("agent service closed the connection before responding")]
    ClosedEarly,
}

/// Thin handle to the Agent Service's WebSocket endpoint. Stateless: every
/// call opens its own connection, mirroring the Agent Service's own
/// per-call statelessness.
#[derive(Clone)]
pub struct AgentClient {
    url: String,
}

impl AgentClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    async fn connect(&self) -> Result<WebSocketStream<MaybeTlsStream<TcpStream>>, ClientError> {
        let (ws, _) = tokio::time::timeout(CONNECT_TIMEOUT, connect_async(&self.url))
            .await
            .map_err(|_| ClientError::ConnectTimeout)??;
        Ok(ws)
    }

    async fn send(&self, ws: &mut WebSocketStream<MaybeTlsStream<TcpStream>>, req: &AgentRequest) -> Result<(), ClientError> {
        let json = serde_json::to_string(req)?;
        ws.send(Message::Text(json)).await?;
        Ok(())
    }

    async fn recv_one(ws: &mut WebSocketStream<MaybeTlsStream<TcpStream>>) -> Result<AgentResponse, ClientError> {
        loop {
            let next = tokio::time::timeout(READ_TIMEOUT, ws.next())
                .await
                .map_err(|_| ClientError::ReadTimeout)?;
            let message = next.ok_or(ClientError::ClosedEarly)??;
            match message {
                Message::Text(text) => return Ok(serde_json::from_str(&text)?),
                Message::Close(_) => return Err(ClientError::ClosedEarly),
                _ => continue,
            }
        }
    }

    pub async fn health_check(&self) -> Result<HealthCheckResponse, ClientError> {
        let mut ws = self.connect().await?;
        self.send(&mut ws, &AgentRequest::HealthCheck(HealthCheckRequest {})).await?;
        match Self::recv_one(&mut ws).await? {
            AgentResponse::HealthCheck(health) => Ok(health),
            AgentResponse::Error(e) => Err(ClientError::Remote(e.error)),
            other => Err(ClientError::Remote(format!("unexpected response: {other:?}"))),
        }
    }

    pub async fn process_message(&self, req: MessageRequest) -> Result<MessageResponse, ClientError> {
        let mut ws = self.connect().await?;
        self.send(&mut ws, &AgentRequest::ProcessMessage(req)).await?;
        match Self::recv_one(&mut ws).await? {
            AgentResponse::MessageResponse { response, .. } => Ok(response),
            AgentResponse::Error(e) => Err(ClientError::Remote(e.error)),
            other => Err(ClientError::Remote(format!("unexpected response: {other:?}"))),
        }
    }

    /// Opens a connection, sends `StreamMessage`, and spawns a task that
    /// forwards each `StreamChunk` onto the returned channel until `done`
    /// or the connection closes. The caller drives the channel; dropping
    /// the receiver closes the connection on the next send attempt.
    pub async fn stream_message(&self, req: MessageRequest) -> Result<mpsc::Receiver<Result<StreamChunk, ClientError>>, ClientError> {
        let mut ws = self.connect().await?;
        self.send(&mut ws, &AgentRequest::StreamMessage(req)).await?;

        let (tx, rx) = mpsc::channel(64);
        tokio::spawn(async move {
            loop {
                let frame = match Self::recv_one(&mut ws).await {
                    Ok(AgentResponse::StreamChunk(frame)) => frame,
                    Ok(AgentResponse::Error(e)) => {
                        let _ = tx.send(Err(ClientError::Remote(e.error))).await;
                        break;
                    }
                    Ok(other) => {
                        let _ = tx.send(Err(ClientError::Remote(format!("unexpected response: {other:?}")))).await;
                        break;
                    }
                    Err(error) => {
                        let _ = tx.send(Err(error)).await;
                        break;
                    }
                };
                let is_last = frame.chunk.is_last;
                if tx.send(Ok(frame.chunk)).await.is_err() {
                    break;
                }
                if is_last {
                    break;
                }
            }
        });
        Ok(rx)
    }
}
