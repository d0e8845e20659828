//! Plan mode: a single upfront LLM call produces an ordered plan, which is
//! then executed step by step through the Tool Registry with no further
//! LLM reasoning in between, followed by one synthesis call over the
//! collected results. A plan that fails to parse falls back to ReAct mode.

use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use wayfarer_protocol::Chunk;

use super::{emit, react_mode, DispatchResult, Turn};
use crate::action::Action;
use crate::evaluation_engine::EvaluationEngine;
use crate::history::HistoryStep;
use crate::llm::{LlmClient, MessageChunk};
use crate::message::Message;
use crate::react::ReactConfig;
use crate::thought::{Phase, Thought, ThoughtType};
use crate::tool::{ExecutionResult, FailureKind, ToolRegistry};

#[derive(Debug, Deserialize)]
struct PlanDocument {
    goal: String,
    steps: Vec<PlanStep>,
}

#[derive(Debug, Deserialize)]
struct PlanStep {
    #[allow(dead_code)]
    step: u32,
    action: String,
    #[serde(default)]
    params: serde_json::Value,
    #[allow(dead_code)]
    description: String,
    phase: String,
}

pub(super) async fn run(
    llm: &Arc<dyn LlmClient>,
    tools: &Arc<ToolRegistry>,
    config: &ReactConfig,
    turn: &Turn,
    cancel: Option<CancellationToken>,
    emit_tx: &mpsc::Sender<Chunk>,
) -> DispatchResult {
    let prompt = format!(
        "Produce a JSON plan for this request: \"{}\". Reply with exactly one JSON object \
         {{\"goal\": string, \"steps\": [{{\"step\": number, \"action\": tool_name, \"params\": {{...}}, \
         \"description\": string, \"phase\": string}}]}}.",
        turn.user_input
    );
    let response = llm.invoke(&[Message::user(prompt)]).await;

    let plan = match response.ok().and_then(|r| parse_plan(&r.content)) {
        Some(plan) => plan,
        None => return react_mode::run(llm, tools, config, turn, cancel, emit_tx).await,
    };

    if !emit(emit_tx, Chunk::ReasoningStart).await {
        return DispatchResult { answer: String::new(), total_steps: 0, tools_used: vec![], success: false, history: vec![] };
    }
    if !emit(emit_tx, Chunk::ReasoningChunk { text: format!("plan: {}", plan.goal) }).await {
        return DispatchResult { answer: String::new(), total_steps: 0, tools_used: vec![], success: false, history: vec![] };
    }

    let evaluation_engine = EvaluationEngine::new();
    let mut history = Vec::new();
    let mut tools_used = Vec::new();
    let mut any_success = false;
    let mut any_step = false;
    let total_steps = plan.steps.len() as u32;

    for (index, step) in plan.steps.iter().enumerate() {
        if cancel.as_ref().is_some_and(|token| token.is_cancelled()) {
            break;
        }
        any_step = true;
        if !emit(
            emit_tx,
            Chunk::ReasoningChunk { text: format!("[{}] executing '{}'", step.phase, step.action) },
        )
        .await
        {
            break;
        }

        // Unknown tools are surfaced through the registry's own `not_found`
        // outcome rather than skipped silently, so they still show up in
        // history as a recorded FAILED action.
        let mut action = Action::pending(step.action.clone(), step.params.clone());
        action.start();
        match tools.execute(&step.action, step.params.clone()).await {
            ExecutionResult::Success { value } => {
                action.succeed(value);
                any_success = true;
                tools_used.push(step.action.clone());
            }
            ExecutionResult::Failure { kind: FailureKind::Timeout, .. } => action.time_out(),
            ExecutionResult::Failure { kind: FailureKind::NotFound, message } => {
                emit(emit_tx, Chunk::ReasoningChunk { text: format!("'{}' is not a known tool", step.action) }).await;
                action.fail(message);
            }
            ExecutionResult::Failure { message, .. } => {
                emit(emit_tx, Chunk::ReasoningChunk { text: format!("'{}' failed: {}", step.action, message) }).await;
                action.fail(message);
            }
        }

        let evaluation = evaluation_engine.evaluate(&action);
        let thought = Thought::new(ThoughtType::Inference, Phase::Execution, step.description.clone(), if action.is_terminal() && evaluation.success { 0.8 } else { 0.5 });
        history.push(HistoryStep::new(index, Phase::Execution, thought, Some(action), Some(evaluation)));
    }
    tools_used.sort();
    tools_used.dedup();

    if !emit(emit_tx, Chunk::ReasoningEnd).await {
        return DispatchResult { answer: String::new(), total_steps, tools_used, success: !any_step || any_success, history };
    }

    let answer = synthesize(llm, turn, &plan.goal, emit_tx).await;
    DispatchResult { answer, total_steps, tools_used, success: !any_step || any_success, history }
}

async fn synthesize(llm: &Arc<dyn LlmClient>, turn: &Turn, goal: &str, emit_tx: &mpsc::Sender<Chunk>) -> String {
    if !emit(emit_tx, Chunk::AnswerStart).await {
        return String::new();
    }
    let mut messages = turn.context.clone();
    messages.push(Message::user(format!(
        "User asked: {}\nPlan goal: {}\nWrite the final answer for the user based on the steps just executed.",
        turn.user_input, goal
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
    response.map(|r| r.content).unwrap_or_default()
}

fn parse_plan(raw: &str) -> Option<PlanDocument> {
    let trimmed = raw.trim();
    let json_slice = trimmed.find('{').zip(trimmed.rfind('}')).map(|(start, end)| &trimmed[start..=end])?;
    serde_json::from_str(json_slice).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlm;
    use crate::tool::builtin;

    fn registry() -> Arc<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        builtin::register_all(&mut registry);
        Arc::new(registry)
    }

    #[test]
    fn parse_plan_extracts_json_object_from_surrounding_prose() {
        let raw = r#"Sure, here you go: {"goal": "plan a trip", "steps": [
            {"step": 1, "action": "search_cities", "params": {"interests": ["food"]}, "description": "find cities", "phase": "search"}
        ]} Hope that helps!"#;
        let plan = parse_plan(raw).unwrap();
        assert_eq!(plan.goal, "plan a trip");
        assert_eq!(plan.steps.len(), 1);
        assert_eq!(plan.steps[0].action, "search_cities");
    }

    #[tokio::test]
    async fn unparseable_plan_falls_back_to_react_mode() {
        let llm: Arc<dyn LlmClient> = Arc::new(MockLlm::sequence(vec![
            "I cannot produce a plan".to_string(),
            "general_chat".to_string(),
            "[]".to_string(),
            "A direct answer instead.".to_string(),
        ]));
        let config = ReactConfig::default();
        let turn = Turn { session_id: "s1".into(), user_input: "anything".into(), context: vec![] };
        let (tx, mut rx) = mpsc::channel(64);
        let result = run(&llm, &registry(), &config, &turn, None, &tx).await;
        drop(tx);
        let mut saw_reasoning = false;
        while let Some(chunk) = rx.recv().await {
            if matches!(chunk, Chunk::ReasoningStart) {
                saw_reasoning = true;
            }
        }
        assert!(saw_reasoning, "fallback should go through ReAct mode's reasoning trace");
        assert_eq!(result.answer, "A direct answer instead.");
    }

    #[tokio::test]
    async fn reasoning_end_precedes_answer_start() {
        let llm: Arc<dyn LlmClient> = Arc::new(MockLlm::sequence(vec![
            r#"{"goal": "trip", "steps": [{"step": 1, "action": "search_cities", "params": {}, "description": "x", "phase": "search"}]}"#.to_string(),
            "Synthesized answer.".to_string(),
        ]));
        let config = ReactConfig::default();
        let turn = Turn { session_id: "s1".into(), user_input: "anything".into(), context: vec![] };
        let (tx, mut rx) = mpsc::channel(64);
        let _result = run(&llm, &registry(), &config, &turn, None, &tx).await;
        drop(tx);

        let mut saw_start = false;
        let mut saw_end = false;
        let mut answer_seen_after_end = false;
        while let Some(chunk) = rx.recv().await {
            match chunk {
                Chunk::ReasoningStart => saw_start = true,
                Chunk::ReasoningEnd => saw_end = true,
                Chunk::AnswerStart => {
                    answer_seen_after_end = saw_end;
                    break;
                }
                _ => {}
            }
        }
        assert!(saw_start, "plan mode must emit ReasoningStart");
        assert!(answer_seen_after_end, "AnswerStart must be preceded by ReasoningEnd");
    }

    #[tokio::test]
    async fn unknown_tool_in_plan_is_skipped_not_fatal() {
        let llm: Arc<dyn LlmClient> = Arc::new(MockLlm::sequence(vec![
            r#"{"goal": "trip", "steps": [{"step": 1, "action": "ghost_tool", "params": {}, "description": "x", "phase": "search"}]}"#.to_string(),
            "Synthesized answer.".to_string(),
        ]));
        let config = ReactConfig::default();
        let turn = Turn { session_id: "s1".into(), user_input: "anything".into(), context: vec![] };
        let (tx, _rx) = mpsc::channel(64);
        let result = run(&llm, &registry(), &config, &turn, None, &tx).await;
        assert!(result.tools_used.is_empty());
        let recorded = result.history[0].action.as_ref().unwrap();
        assert_eq!(recorded.status, crate::action::ActionStatus::Failed);
    }
}
