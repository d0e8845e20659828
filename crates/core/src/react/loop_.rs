//! The ReAct Loop: a bounded Reason-Act-Observe-Evaluate state machine.
//!
//! One [`ReactLoop::run`] call drives exactly one task from a fresh
//! [`ShortTermMemory`] to completion. The loop owns all mutable state for
//! that task; the engines and registry it holds are stateless or
//! read-only, so nothing here outlives the call except what the caller
//! keeps in the returned [`ReactOutcome`].

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use crate::action::{Action, ActionStatus};
use crate::evaluation_engine::EvaluationEngine;
use crate::history::HistoryStep;
use crate::llm::LlmClient;
use crate::memory::ShortTermMemory;
use crate::message::Message;
use crate::observation::Observation;
use crate::react::config::ReactConfig;
use crate::thought::{Phase, PlannedStep, Thought};
use crate::thought_engine::ThoughtEngine;
use crate::tool::{ExecutionResult, FailureKind, ToolRegistry};

/// Why the loop stopped iterating, recorded for the Mode Dispatcher's
/// final-answer synthesis and for the task's stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// A terminal tool (e.g. `final_answer`) succeeded.
    TerminalToolSuccess,
    /// The latest thought crossed the confidence threshold with a
    /// decision already in hand.
    HighConfidenceDecision,
    /// Planning produced no steps; the loop answered directly.
    EmptyPlan,
    /// `max_steps` was exhausted without a terminal success.
    StepBudgetExhausted,
    /// The task deadline elapsed before the stop predicate was met.
    DeadlineExceeded,
    /// The caller's cancellation token fired at a suspension point.
    Cancelled,
}

/// Result of one `ReactLoop::run` call.
pub struct ReactOutcome {
    pub history: Vec<HistoryStep>,
    pub stop_reason: StopReason,
    /// Set only for [`StopReason::EmptyPlan`]: the loop answered directly
    /// rather than driving any tool calls, so there are no tool results
    /// for the Mode Dispatcher to synthesize over.
    pub direct_answer: Option<String>,
    pub tools_used: Vec<String>,
    pub steps_completed: usize,
    /// False only when the loop exhausted its step budget or deadline
    /// without ever recording a successful action.
    pub success: bool,
}

pub struct ReactLoop {
    llm: Arc<dyn LlmClient>,
    thought_engine: ThoughtEngine,
    evaluation_engine: EvaluationEngine,
    tools: Arc<ToolRegistry>,
    config: ReactConfig,
}

impl ReactLoop {
    pub fn new(llm: Arc<dyn LlmClient>, tools: Arc<ToolRegistry>, config: ReactConfig) -> Self {
        Self {
            thought_engine: ThoughtEngine::new(llm.clone()),
            evaluation_engine: EvaluationEngine::new(),
            llm,
            tools,
            config,
        }
    }

    /// Drives one task to completion. `cancel`, if given, is polled once
    /// per iteration boundary (a suspension point); once it fires the loop
    /// refuses further tool invocations and returns immediately with
    /// whatever history has accumulated.
    pub async fn run(
        &self,
        user_input: &str,
        context: &[Message],
        cancel: Option<CancellationToken>,
    ) -> ReactOutcome {
        let start = Instant::now();
        let mut memory = ShortTermMemory::new();
        let mut confidence = 0.6_f32;
        let mut pending: Vec<PlannedStep> = Vec::new();
        let mut reasoning_only_run = 0_usize;

        let mut stop_reason = StopReason::StepBudgetExhausted;
        let mut direct_answer = None;

        for step in 0..self.config.max_steps {
            if cancel.as_ref().is_some_and(|token| token.is_cancelled()) {
                stop_reason = StopReason::Cancelled;
                break;
            }
            if self.config.task_deadline.is_some_and(|deadline| start.elapsed() >= deadline) {
                stop_reason = StopReason::DeadlineExceeded;
                break;
            }

            if step == 0 {
                let analysis = self.thought_engine.analyze_task(user_input, context).await;
                memory.record(HistoryStep::new(step, Phase::Understanding, analysis.clone(), None, None));

                let tool_descriptors = self.tools.list();
                let planning = self.thought_engine.plan_actions(&analysis, &tool_descriptors).await;
                confidence = planning.confidence;

                if !planning.has_tool_decision() {
                    memory.record(HistoryStep::new(step, Phase::Planning, planning, None, None));
                    stop_reason = StopReason::EmptyPlan;
                    direct_answer = Some(self.answer_directly(user_input, context).await);
                    break;
                }

                let decision = planning.decision.clone().unwrap_or_default();
                pending = decision.remaining.clone();
                let planned = decision.next.clone().unwrap();
                let (action, evaluation) = self.act_on(planned, &memory).await;
                memory.record(HistoryStep::new(step, Phase::Planning, planning, Some(action), Some(evaluation)));
                continue;
            }

            let last_thought = memory.view().last().map(|h| &h.thought);
            let last_action = memory.last_action();
            if self.should_stop(last_thought, last_action, step, reasoning_only_run) {
                stop_reason = if last_action.is_some_and(|a| a.status == ActionStatus::Success && self.tools.is_terminal(&a.tool_name)) {
                    StopReason::TerminalToolSuccess
                } else if step >= self.config.max_steps.saturating_sub(1) || reasoning_only_run >= self.config.max_reasoning_depth {
                    StopReason::StepBudgetExhausted
                } else {
                    StopReason::HighConfidenceDecision
                };
                let decision_thought = self.thought_engine.decide(confidence);
                memory.record(HistoryStep::new(step, Phase::Generation, decision_thought, None, None));
                break;
            }

            let observation = Observation {
                step,
                history_summary: summarize(&memory),
                last_action_result: last_action.cloned(),
                elapsed: start.elapsed(),
            };

            let next = pop_next_step(&mut pending);
            let thought = match last_action {
                Some(action) if matches!(action.status, ActionStatus::Failed | ActionStatus::Timeout) => {
                    self.thought_engine.reflect(action, next)
                }
                _ => self.thought_engine.observe_infer(&observation, confidence, next),
            };
            confidence = thought.confidence;

            if !thought.has_tool_decision() {
                reasoning_only_run += 1;
                memory.record(HistoryStep::new(step, Phase::Execution, thought, None, None));
                continue;
            }
            reasoning_only_run = 0;

            let planned = thought.decision.clone().unwrap().next.unwrap();
            let (action, evaluation) = self.act_on(planned, &memory).await;
            memory.record(HistoryStep::new(step, Phase::Execution, thought, Some(action), Some(evaluation)));
        }

        let success = match stop_reason {
            StopReason::TerminalToolSuccess | StopReason::HighConfidenceDecision | StopReason::EmptyPlan => true,
            StopReason::StepBudgetExhausted | StopReason::DeadlineExceeded | StopReason::Cancelled => {
                memory.view().iter().any(|h| h.action.as_ref().is_some_and(|a| a.status == ActionStatus::Success))
            }
        };

        ReactOutcome {
            tools_used: memory.tools_used(),
            steps_completed: memory.steps_completed(),
            history: memory.view().to_vec(),
            stop_reason,
            direct_answer,
            success,
        }
    }

    /// Acts on one planned step: a duplicate of an already-attempted
    /// `(tool, params)` pair is coalesced to `Skipped` without invoking
    /// the registry, satisfying the no-auto-retry rule for free.
    async fn act_on(&self, planned: PlannedStep, memory: &ShortTermMemory) -> (Action, crate::evaluation::Evaluation) {
        let mut action = Action::pending(planned.tool.clone(), planned.params.clone());
        if memory.already_attempted(&planned.tool, &planned.params) {
            action.skip("duplicate of an earlier planned step");
        } else {
            action.start();
            match self.tools.execute(&planned.tool, planned.params.clone()).await {
                ExecutionResult::Success { value } => action.succeed(value),
                ExecutionResult::Failure { kind: FailureKind::Timeout, .. } => action.time_out(),
                ExecutionResult::Failure { message, .. } => action.fail(message),
            }
        }
        let evaluation = self.evaluation_engine.evaluate(&action);
        (action, evaluation)
    }

    async fn answer_directly(&self, user_input: &str, context: &[Message]) -> String {
        let mut messages = context.to_vec();
        messages.push(Message::user(user_input));
        match self.llm.invoke(&messages).await {
            Ok(response) => response.content,
            Err(_) => "I wasn't able to produce an answer for that.".to_string(),
        }
    }

    fn should_stop(&self, last_thought: Option<&Thought>, last_action: Option<&Action>, step: usize, reasoning_only_run: usize) -> bool {
        let terminal_success = last_action.is_some_and(|a| a.status == ActionStatus::Success && self.tools.is_terminal(&a.tool_name));
        let high_confidence = last_thought.is_some_and(|t| t.confidence > 0.9 && t.decision.is_some());
        let reasoning_exhausted = reasoning_only_run >= self.config.max_reasoning_depth;
        terminal_success || high_confidence || reasoning_exhausted || step >= self.config.max_steps.saturating_sub(1)
    }
}

/// Pops the next queued planned step, if any. A step that turns out to
/// duplicate an earlier call is still handed to [`ReactLoop::act_on`],
/// which records it as `Skipped` rather than silently dropping it.
fn pop_next_step(pending: &mut Vec<PlannedStep>) -> Option<PlannedStep> {
    if pending.is_empty() {
        None
    } else {
        Some(pending.remove(0))
    }
}

fn summarize(memory: &ShortTermMemory) -> String {
    let tools = memory.tools_used();
    if tools.is_empty() {
        "no tools called yet".to_string()
    } else {
        format!("called: {}", tools.join(", "))
    }
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

    #[tokio::test]
    async fn empty_plan_answers_directly_without_touching_any_tool() {
        let llm = Arc::new(MockLlm::sequence(vec![
            "general_chat".to_string(),
            "[]".to_string(),
            "Hangzhou and Kyoto are both lovely in autumn.".to_string(),
        ]));
        let loop_ = ReactLoop::new(llm, registry(), ReactConfig::default());
        let outcome = loop_.run("What's a nice place to visit?", &[], None).await;
        assert_eq!(outcome.stop_reason, StopReason::EmptyPlan);
        assert_eq!(outcome.direct_answer.as_deref(), Some("Hangzhou and Kyoto are both lovely in autumn."));
        assert!(outcome.tools_used.is_empty());
        assert!(outcome.success);
    }

    #[tokio::test]
    async fn terminal_tool_success_stops_the_loop() {
        let llm = Arc::new(MockLlm::sequence(vec![
            "general_chat".to_string(),
            r#"[{"tool": "final_answer", "params": {"text": "Here is your answer."}}]"#.to_string(),
        ]));
        let loop_ = ReactLoop::new(llm, registry(), ReactConfig::default());
        let outcome = loop_.run("anything", &[], None).await;
        assert_eq!(outcome.stop_reason, StopReason::TerminalToolSuccess);
        assert!(outcome.success);
        assert_eq!(outcome.tools_used, vec!["final_answer".to_string()]);
    }

    #[tokio::test]
    async fn step_budget_exhaustion_with_no_success_reports_failure() {
        let llm = Arc::new(MockLlm::sequence(vec![
            "general_chat".to_string(),
            r#"[{"tool": "ghost_tool", "params": {}}]"#.to_string(),
        ]));
        let mut config = ReactConfig::default();
        config.max_steps = 3;
        let loop_ = ReactLoop::new(llm, registry(), config);
        let outcome = loop_.run("anything", &[], None).await;
        assert_eq!(outcome.stop_reason, StopReason::StepBudgetExhausted);
        assert!(!outcome.success);
    }

    #[tokio::test]
    async fn cancellation_is_observed_before_the_next_iteration() {
        let llm = Arc::new(MockLlm::fixed("[]"));
        let token = CancellationToken::new();
        token.cancel();
        let loop_ = ReactLoop::new(llm, registry(), ReactConfig::default());
        let outcome = loop_.run("anything", &[], Some(token)).await;
        assert_eq!(outcome.stop_reason, StopReason::Cancelled);
        assert!(outcome.history.is_empty());
    }

    #[tokio::test]
    async fn duplicate_planned_step_is_coalesced_to_skipped() {
        let llm = Arc::new(MockLlm::sequence(vec![
            "general_chat".to_string(),
            r#"[{"tool": "search_cities", "params": {}}, {"tool": "search_cities", "params": {}}]"#.to_string(),
        ]));
        let mut config = ReactConfig::default();
        config.max_steps = 4;
        let loop_ = ReactLoop::new(llm, registry(), config);
        let outcome = loop_.run("anything", &[], None).await;
        let skipped = outcome
            .history
            .iter()
            .filter_map(|h| h.action.as_ref())
            .filter(|a| a.status == ActionStatus::Skipped)
            .count();
        assert_eq!(skipped, 1);
    }
}
