//! Translates the Agent Service's `StreamChunk` frames into the SSE event
//! types named in the external chat surface, inserting a heartbeat every
//! 30 seconds of silence.

use std::convert::Infallible;
use std::time::Duration;

use axum::response::sse::Event;
use futures_util::StreamExt;
use serde_json::json;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use wayfarer_protocol::StreamChunk;

use crate::client::ClientError;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

fn event(event_type: &str, payload: serde_json::Value) -> Event {
    let mut body = payload;
    if let serde_json::Value::Object(ref mut map) = body {
        map.insert("type".to_string(), json!(event_type));
    }
    Event::default().data(body.to_string())
}

fn chunk_to_event(chunk: &StreamChunk) -> Event {
    match chunk.chunk_type.as_str() {
        "thinking_start" => event("reasoning_start", json!({})),
        "thinking_chunk" => event("reasoning_chunk", json!({ "text": chunk.content })),
        "thinking_end" => event("reasoning_end", json!({})),
        "answer_start" => event("answer_start", json!({})),
        "answer" => event("chunk", json!({ "text": chunk.content })),
        "error" => event("error", json!({ "error": chunk.content })),
        "done" => {
            let stats: serde_json::Value = serde_json::from_str(&chunk.content).unwrap_or(json!({}));
            event("done", json!({ "stats": stats }))
        }
        other => event(other, json!({ "text": chunk.content })),
    }
}

/// Builds the SSE event stream for one chat turn. `session_id` is emitted
/// first (the SSE surface's own `session_id` event, not carried by the
/// Agent Service's `StreamChunk`); then every forwarded chunk is
/// translated; a `heartbeat` event is interleaved whenever 30 seconds pass
/// with nothing to forward; on a client error the stream emits one `error`
/// event before its terminal `done`.
pub fn chat_stream(
    session_id: String,
    mut chunks: mpsc::Receiver<Result<StreamChunk, ClientError>>,
) -> impl futures_util::Stream<Item = Result<Event, Infallible>> {
    let (tx, rx) = mpsc::channel::<Event>(64);

    tokio::spawn(async move {
        let _ = tx.send(event("session_id", json!({ "session_id": session_id }))).await;

        loop {
            match tokio::time::timeout(HEARTBEAT_INTERVAL, chunks.recv()).await {
                Ok(Some(Ok(chunk))) => {
                    let is_done = chunk.chunk_type == "done";
                    if tx.send(chunk_to_event(&chunk)).await.is_err() {
                        break;
                    }
                    if is_done {
                        break;
                    }
                }
                Ok(Some(Err(error))) => {
                    let _ = tx.send(event("error", json!({ "error": error.to_string() }))).await;
                    let _ = tx.send(event("done", json!({ "stats": {} }))).await;
                    break;
                }
                Ok(None) => {
                    let _ = tx.send(event("done", json!({ "stats": {} }))).await;
                    break;
                }
                Err(_elapsed) => {
                    if tx.send(event("heartbeat", json!({}))).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    ReceiverStream::new(rx).map(Ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn emits_session_id_first_then_translated_chunks_then_done() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(Ok(StreamChunk::answer_start())).await.unwrap();
        tx.send(Ok(StreamChunk::answer("hi"))).await.unwrap();
        tx.send(Ok(StreamChunk::done(&wayfarer_protocol::DoneStats::default()))).await.unwrap();
        drop(tx);

        let mut stream = Box::pin(chat_stream("s1".into(), rx));
        let first = stream.next().await.unwrap().unwrap();
        assert!(format!("{first:?}").contains("session_id"));

        let mut saw_done = false;
        while let Some(Ok(ev)) = stream.next().await {
            if format!("{ev:?}").contains("\"type\":\"done\"") {
                saw_done = true;
                break;
            }
        }
        assert!(saw_done);
    }

    #[tokio::test]
    async fn upstream_error_yields_error_then_done() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(Err(ClientError::ClosedEarly)).await.unwrap();
        drop(tx);

        let mut stream = Box::pin(chat_stream("s1".into(), rx));
        let _session_id_event = stream.next().await.unwrap().unwrap();
        let error_event = stream.next().await.unwrap().unwrap();
        assert!(format!("{error_event:?}").contains("\"type\":\"error\""));
        let done_event = stream.next().await.unwrap().unwrap();
        assert!(format!("{done_event:?}").contains("\"type\":\"done\""));
        assert!(stream.next().await.is_none());
    }
}
