//! Short-Term Memory: bounded append-only record of the current task.
//! Owned exclusively by the ReAct Loop; other components receive
//! read-only views, never a back-pointer.

use crate::action::Action;
use crate::history::HistoryStep;

/// Append-only sequence of [`HistoryStep`]s for one task. Cleared at task
/// boundaries; never shared across concurrent tasks.
#[derive(Default)]
pub struct ShortTermMemory {
    steps: Vec<HistoryStep>,
}

impl ShortTermMemory {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn record(&mut self, step: HistoryStep) {
        self.steps.push(step);
    }

    pub fn view(&self) -> &[HistoryStep] {
        &self.steps
    }

    pub fn last_action(&self) -> Option<&Action> {
        self.steps.iter().rev().find_map(|s| s.action.as_ref())
    }

    /// Number of loop iterations represented, not the number of recorded
    /// [`HistoryStep`]s: a single iteration can record more than one step
    /// (e.g. step 0's UNDERSTANDING and PLANNING, or a final standalone
    /// DECISION step), and all of them carry that iteration's `step` index.
    pub fn steps_completed(&self) -> usize {
        self.steps.iter().map(|s| s.step).max().map_or(0, |max| max + 1)
    }

    /// Distinct tool names invoked so far (excludes skipped/no-op actions
    /// with no tool name recorded).
    pub fn tools_used(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .steps
            .iter()
            .filter_map(|s| s.action.as_ref())
            .map(|a| a.tool_name.clone())
            .collect();
        names.dedup();
        names.sort();
        names.dedup();
        names
    }

    /// Whether `(tool_name, params)` was already attempted this task, used
    /// by the loop to coalesce duplicate planned steps and to avoid
    /// auto-retrying an identical failed call.
    pub fn already_attempted(&self, tool_name: &str, params: &serde_json::Value) -> bool {
        self.steps.iter().any(|s| {
            s.action
                .as_ref()
                .is_some_and(|a| a.tool_name == tool_name && &a.params == params)
        })
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }
}
