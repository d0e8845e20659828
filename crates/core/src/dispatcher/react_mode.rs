//! ReAct mode: drives the ReAct Loop, translates its history into
//! `reasoning_*` events, then synthesizes a final answer over whatever
//! tool results the loop collected.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use wayfarer_protocol::Chunk;

use super::{emit, DispatchResult, Turn};
use crate::history::HistoryStep;
use crate::llm::{LlmClient, MessageChunk};
use crate::message::Message;
use crate::react::{ReactConfig, ReactLoop, ReactOutcome};
use crate::tool::ToolRegistry;

pub(super) async fn run(
    llm: &Arc<dyn LlmClient>,
    tools: &Arc<ToolRegistry>,
    config: &ReactConfig,
    turn: &Turn,
    cancel: Option<CancellationToken>,
    emit_tx: &mpsc::Sender<Chunk>,
) -> DispatchResult {
    let loop_ = ReactLoop::new(llm.clone(), tools.clone(), config.clone());
    let outcome = loop_.run(&turn.user_input, &turn.context, cancel).await;

    if !emit(emit_tx, Chunk::ReasoningStart).await {
        return outcome_to_result(&outcome, String::new());
    }
    for step in &outcome.history {
        if !emit(emit_tx, Chunk::ReasoningChunk { text: format_step(step) }).await {
            return outcome_to_result(&outcome, String::new());
        }
    }
    if !emit(emit_tx, Chunk::ReasoningEnd).await {
        return outcome_to_result(&outcome, String::new());
    }

    let answer = match &outcome.direct_answer {
        Some(answer) => {
            if emit(emit_tx, Chunk::AnswerStart).await {
                emit(emit_tx, Chunk::AnswerChunk { text: answer.clone() }).await;
            }
            answer.clone()
        }
        None => synthesize_answer(llm, turn, &outcome, emit_tx).await,
    };

    outcome_to_result(&outcome, answer)
}

async fn synthesize_answer(llm: &Arc<dyn LlmClient>, turn: &Turn, outcome: &ReactOutcome, emit_tx: &mpsc::Sender<Chunk>) -> String {
    if !emit(emit_tx, Chunk::AnswerStart).await {
        return String::new();
    }

    let tool_summary = summarize_results(outcome);
    let mut messages = turn.context.clone();
    messages.push(Message::user(format!(
        "User asked: {}\nTool results collected so far:\n{}\nWrite the final answer for the user.",
        turn.user_input, tool_summary
    )));

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
        Ok(response) => response.content,
        Err(error) => {
            emit(emit_tx, Chunk::Error { message: error.to_string() }).await;
            String::new()
        }
    }
}

fn summarize_results(outcome: &ReactOutcome) -> String {
    let lines: Vec<String> = outcome
        .history
        .iter()
        .filter_map(|step| step.action.as_ref())
        .filter(|action| action.result.is_some())
        .map(|action| format!("- {}: {}", action.tool_name, action.result.as_ref().unwrap()))
        .collect();
    if lines.is_empty() {
        "(no tool produced a result)".to_string()
    } else {
        lines.join("\n")
    }
}

fn format_step(step: &HistoryStep) -> String {
    match &step.action {
        Some(action) => format!(
            "[{:?}/{:?}] {} -> {:?} ({})",
            step.phase, step.thought.thought_type, action.tool_name, action.status, step.thought.content
        ),
        None => format!("[{:?}/{:?}] {}", step.phase, step.thought.thought_type, step.thought.content),
    }
}

fn outcome_to_result(outcome: &ReactOutcome, answer: String) -> DispatchResult {
    DispatchResult {
        answer,
        total_steps: outcome.steps_completed as u32,
        tools_used: outcome.tools_used.clone(),
        success: outcome.success,
        history: outcome.history.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlm;
    use crate::tool::builtin;

    #[tokio::test]
    async fn terminal_tool_success_yields_reasoning_then_synthesized_answer() {
        let llm: Arc<dyn LlmClient> = Arc::new(MockLlm::sequence(vec![
            "general_chat".to_string(),
            r#"[{"tool": "final_answer", "params": {"text": "ans"}}]"#.to_string(),
            "Final synthesized answer.".to_string(),
        ]));
        let mut registry = ToolRegistry::new();
        builtin::register_all(&mut registry);
        let tools = Arc::new(registry);
        let config = ReactConfig::default();
        let turn = Turn { session_id: "s1".into(), user_input: "anything".into(), context: vec![] };
        let (tx, mut rx) = mpsc::channel(64);

        let result = run(&llm, &tools, &config, &turn, None, &tx).await;
        drop(tx);

        let mut chunks = Vec::new();
        while let Some(chunk) = rx.recv().await {
            chunks.push(chunk);
        }
        assert!(matches!(chunks.first(), Some(Chunk::ReasoningStart)));
        assert!(chunks.iter().any(|c| matches!(c, Chunk::AnswerStart)));
        assert_eq!(result.answer, "Final synthesized answer.");
        assert!(result.success);
        assert_eq!(result.tools_used, vec!["final_answer".to_string()]);
    }
}
