//! Wire types for the Agent Service's request/response protocol: the
//! surface the RPC Server exposes and the SSE Gateway speaks to as a client.
//!
//! Transported as JSON frames tagged by `type`, the same convention [`Chunk`]
//! uses for the outbound stream.

use serde::{Deserialize, Serialize};

use crate::chunk::DoneStats;

/// A prior turn of the conversation, carried inline since the Agent Service
/// holds no session state of its own — the Gateway, which owns the Session
/// Store, supplies as much history as the dispatcher needs on every call.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContextMessage {
    pub role: String,
    pub content: String,
}

/// One user turn sent to the Agent Service. Carries the dispatch mode
/// (`"direct" | "react" | "plan"`, default `"react"`) alongside the fields
/// named in the external RPC surface.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MessageRequest {
    pub session_id: String,
    pub user_input: String,
    #[serde(default)]
    pub model_id: String,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub stream: bool,
    #[serde(default)]
    pub context: Vec<ContextMessage>,
}

/// Reasoning summary attached to a unary `ProcessMessage` response.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReasoningSummary {
    pub text: String,
    pub total_steps: u32,
    pub tools_used: Vec<String>,
}

/// Unary response to `ProcessMessage`: every event the dispatcher emitted,
/// concatenated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub answer: String,
    pub reasoning: ReasoningSummary,
    #[serde(default)]
    pub error: Option<String>,
    pub history: Vec<serde_json::Value>,
}

/// One frame of a `StreamMessage` response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StreamChunk {
    pub chunk_type: String,
    pub content: String,
    pub is_last: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthCheckRequest {}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub alive: bool,
    pub version: String,
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub id: Option<String>,
    pub error: String,
}

/// Client-to-server request envelope. Each variant maps to a JSON object
/// tagged `"type": "<variant_name>"`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentRequest {
    ProcessMessage(MessageRequest),
    StreamMessage(MessageRequest),
    HealthCheck(HealthCheckRequest),
}

/// A single streamed frame, carrying the request id it answers so a client
/// multiplexing several in-flight calls on one connection can demultiplex.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StreamChunkResponse {
    pub id: String,
    pub chunk: StreamChunk,
}

/// Server-to-client response envelope.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentResponse {
    MessageResponse { id: String, response: MessageResponse },
    StreamChunk(StreamChunkResponse),
    HealthCheck(HealthCheckResponse),
    Error(ErrorResponse),
}

impl StreamChunk {
    pub fn thinking_start() -> Self {
        Self { chunk_type: "thinking_start".into(), content: String::new(), is_last: false }
    }
    pub fn thinking_chunk(text: impl Into<String>) -> Self {
        Self { chunk_type: "thinking_chunk".into(), content: text.into(), is_last: false }
    }
    pub fn thinking_end() -> Self {
        Self { chunk_type: "thinking_end".into(), content: String::new(), is_last: false }
    }
    pub fn answer_start() -> Self {
        Self { chunk_type: "answer_start".into(), content: String::new(), is_last: false }
    }
    pub fn answer(text: impl Into<String>) -> Self {
        Self { chunk_type: "answer".into(), content: text.into(), is_last: false }
    }
    pub fn error(message: impl Into<String>) -> Self {
        Self { chunk_type: "error".into(), content: message.into(), is_last: false }
    }
    pub fn done(stats: &DoneStats) -> Self {
        Self {
            chunk_type: "done".into(),
            content: serde_json::to_string(stats).unwrap_or_default(),
            is_last: true,
        }
    }
}
