//! Direct mode: a single streaming LLM call, no tools, no loop.

use std::sync::Arc;

use tokio::sync::mpsc;
use wayfarer_protocol::Chunk;

use super::{emit, DispatchResult, Turn};
use crate::llm::{LlmClient, MessageChunk};
use crate::message::Message;

const SYSTEM_PROMPT: &str = "You are a helpful travel assistant. Answer directly and concisely.";

pub(super) async fn run(llm: &Arc<dyn LlmClient>, turn: &Turn, emit_tx: &mpsc::Sender<Chunk>) -> DispatchResult {
    if !emit(emit_tx, Chunk::AnswerStart).await {
        return DispatchResult { answer: String::new(), total_steps: 0, tools_used: vec![], success: false, history: vec![] };
    }

    let mut messages = vec![Message::user(SYSTEM_PROMPT)];
    messages.extend(turn.context.iter().cloned());
    messages.push(Message::user(turn.user_input.clone()));

    let (chunk_tx, mut chunk_rx) = mpsc::channel::<MessageChunk>(16);
    let forward_tx = emit_tx.clone();
    let forwarder = tokio::spawn(async move {
        while let Some(chunk) = chunk_rx.recv().await {
            if !emit(&forward_tx, Chunk::AnswerChunk { text: chunk.content }).await {
                break;
            }
        }
    });

    let response = llm.invoke_stream(&messages, Some(chunk_tx)).await;
    let _ = forwarder.await;

    match response {
        Ok(response) => DispatchResult { answer: response.content, total_steps: 0, tools_used: vec![], success: true, history: vec![] },
        Err(error) => {
            emit(emit_tx, Chunk::Error { message: error.to_string() }).await;
            DispatchResult { answer: String::new(), total_steps: 0, tools_used: vec![], success: false, history: vec![] }
        }
    }
}
