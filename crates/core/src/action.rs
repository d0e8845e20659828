//! Action: one tool invocation and its state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Pending,
    Running,
    Success,
    Failed,
    Timeout,
    Skipped,
}

/// One tool invocation, owned by the ReAct Loop.
///
/// State machine: `Pending -> Running -> {Success, Failed, Timeout}`;
/// `Skipped` is terminal and reachable only from `Pending`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Action {
    pub id: Uuid,
    pub tool_name: String,
    pub params: serde_json::Value,
    pub status: ActionStatus,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
}

impl Action {
    pub fn pending(tool_name: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            tool_name: tool_name.into(),
            params,
            status: ActionStatus::Pending,
            result: None,
            error: None,
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    /// Transitions Pending -> Running. Panics if called from any other state
    /// (a programmer error in the loop, not a runtime condition).
    pub fn start(&mut self) {
        assert_eq!(self.status, ActionStatus::Pending, "start() requires Pending");
        self.status = ActionStatus::Running;
    }

    pub fn succeed(&mut self, result: serde_json::Value) {
        self.status = ActionStatus::Success;
        self.result = Some(result);
        self.ended_at = Some(Utc::now());
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = ActionStatus::Failed;
        self.error = Some(error.into());
        self.ended_at = Some(Utc::now());
    }

    pub fn time_out(&mut self) {
        self.status = ActionStatus::Timeout;
        self.error = Some("deadline exceeded".to_string());
        self.ended_at = Some(Utc::now());
    }

    /// Marks the action skipped without ever running. Only valid from Pending.
    pub fn skip(&mut self, reason: impl Into<String>) {
        assert_eq!(self.status, ActionStatus::Pending, "skip() requires Pending");
        self.status = ActionStatus::Skipped;
        self.error = Some(reason.into());
        self.ended_at = Some(Utc::now());
    }

    pub fn duration(&self) -> Option<chrono::Duration> {
        self.ended_at.map(|end| end - self.started_at)
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self.status, ActionStatus::Pending | ActionStatus::Running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_machine_goes_pending_running_success() {
        let mut a = Action::pending("search_cities", serde_json::json!({}));
        assert_eq!(a.status, ActionStatus::Pending);
        a.start();
        assert_eq!(a.status, ActionStatus::Running);
        a.succeed(serde_json::json!({"cities": ["Hangzhou"]}));
        assert_eq!(a.status, ActionStatus::Success);
        assert!(a.is_terminal());
        assert!(a.duration().is_some());
    }

    #[test]
    fn skip_is_reachable_only_from_pending() {
        let mut a = Action::pending("search_cities", serde_json::json!({}));
        a.skip("duplicate of an earlier planned step");
        assert_eq!(a.status, ActionStatus::Skipped);
        assert!(a.is_terminal());
    }

    #[test]
    #[should_panic(expected = "skip() requires Pending")]
    fn skip_after_start_panics() {
        let mut a = Action::pending("search_cities", serde_json::json!({}));
        a.start();
        a.skip("too late");
    }
}
