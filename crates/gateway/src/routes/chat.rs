//! `POST /api/chat/stream`: the SSE chat surface. Owns the per-session
//! append of the user turn before dispatch and the assistant reply after
//! the terminal `done`, since the Agent Service it calls holds no session
//! state of its own.

use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::Sse;
use axum::Json;
use serde::Deserialize;
use tokio::sync::mpsc;
use uuid::Uuid;
use wayfarer_core::{Message, Role, Session};
use wayfarer_protocol::{ContextMessage, MessageRequest, StreamChunk};

use crate::app::AppState;
use crate::client::ClientError;
use crate::sse::chat_stream;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: Option<String>,
    pub mode: Option<String>,
}

fn session_context(session: &Session) -> Vec<ContextMessage> {
    session
        .messages
        .iter()
        .map(|m| ContextMessage {
            role: match m.role {
                Role::User => "user".to_string(),
                Role::Assistant => "assistant".to_string(),
            },
            content: m.content.clone(),
        })
        .collect()
}

/// Wraps the Agent Service's raw chunk stream: forwards every chunk
/// unchanged for SSE rendering, and on the terminal `done` (or an
/// unrecoverable error) appends the accumulated assistant answer to the
/// session log exactly once.
fn tap_for_session_log(
    state: Arc<AppState>,
    session_id: Uuid,
    mut upstream: mpsc::Receiver<Result<StreamChunk, ClientError>>,
) -> mpsc::Receiver<Result<StreamChunk, ClientError>> {
    let (tx, rx) = mpsc::channel(64);
    tokio::spawn(async move {
        let mut answer = String::new();
        while let Some(item) = upstream.recv().await {
            let is_terminal = match &item {
                Ok(chunk) => {
                    if chunk.chunk_type == "answer" {
                        answer.push_str(&chunk.content);
                    }
                    chunk.chunk_type == "done"
                }
                Err(_) => true,
            };
            let forward_failed = tx.send(item).await.is_err();
            if forward_failed {
                break;
            }
            if is_terminal {
                break;
            }
        }
        if !answer.is_empty() {
            let _ = state.sessions.append_message(session_id, Message::assistant(answer, None)).await;
        }
    });
    rx
}

pub async fn stream(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Sse<impl futures_util::Stream<Item = Result<axum::response::sse::Event, std::convert::Infallible>>> {
    let session_id = req
        .session_id
        .as_deref()
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .unwrap_or_else(Uuid::new_v4);

    if req.message.trim().is_empty() {
        let (tx, rx) = mpsc::channel(1);
        let _ = tx.try_send(Ok(StreamChunk::error("message must not be empty")));
        drop(tx);
        return Sse::new(chat_stream(session_id.to_string(), rx));
    }

    let session = state.sessions.get_or_create(session_id, None, None).await;
    let context = session_context(&session);

    state
        .sessions
        .append_message(session_id, Message::user(req.message.clone()))
        .await
        .expect("session just created via get_or_create");

    let model_id = session.model_id.clone();
    let upstream = match state
        .agent
        .stream_message(MessageRequest {
            session_id: session_id.to_string(),
            user_input: req.message,
            model_id,
            mode: req.mode,
            stream: true,
            context,
        })
        .await
    {
        Ok(rx) => rx,
        Err(error) => {
            let (tx, rx) = mpsc::channel(1);
            let _ = tx.try_send(Err(error));
            rx
        }
    };

    let tapped = tap_for_session_log(state, session_id, upstream);
    Sse::new(chat_stream(session_id.to_string(), tapped))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(
            Arc::new(wayfarer_config::ModelRegistry::default()),
            crate::client::AgentClient::new("ws://127.0.0.1:1"),
        ))
    }

    #[tokio::test]
    async fn blank_message_is_rejected_without_creating_a_session() {
        let state = state();
        let req = ChatRequest { message: "   ".into(), session_id: None, mode: None };
        // The guard must fire before any session is touched or the Agent
        // Service is called, so this must resolve without ever reaching the
        // unreachable `agent_url` above.
        let _sse = stream(State(state.clone()), Json(req)).await;
        assert_eq!(state.sessions.list(true).await.len(), 0, "no session should be created for a rejected message");
    }
}
