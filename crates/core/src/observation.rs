//! Observation: the snapshot fed into each think step.

use crate::action::Action;

/// Read-only snapshot of loop state passed to the Thought Engine. Built
/// fresh each iteration from Short-Term Memory; never stored back.
#[derive(Clone, Debug)]
pub struct Observation {
    pub step: usize,
    pub history_summary: String,
    pub last_action_result: Option<Action>,
    pub elapsed: std::time::Duration,
}
