//! Evaluation: derived assessment of one Action's outcome.

use crate::action::{Action, ActionStatus};

/// Purely derived from an [`Action`]; the Evaluation Engine never mutates it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Evaluation {
    pub success: bool,
    pub duration_ms: i64,
    pub has_result: bool,
    pub confidence_delta: f32,
}

impl Evaluation {
    /// Success iff `status == Success` and the result is non-empty.
    /// `confidence_delta` rewards success and penalizes failure/timeout,
    /// feeding the Thought Engine's rising-confidence heuristic.
    pub fn from_action(action: &Action) -> Self {
        let has_result = action
            .result
            .as_ref()
            .is_some_and(|v| !matches!(v, serde_json::Value::Null) && v != &serde_json::json!(""));
        let success = action.status == ActionStatus::Success && has_result;
        let duration_ms = action.duration().map(|d| d.num_milliseconds()).unwrap_or(0);
        let confidence_delta = match action.status {
            ActionStatus::Success if has_result => 0.1,
            ActionStatus::Failed | ActionStatus::Timeout => -0.1,
            _ => 0.0,
        };
        Self { success, duration_ms, has_result, confidence_delta }
    }
}
