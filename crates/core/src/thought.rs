//! Thought: a structured reasoning artifact produced by the Thought Engine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThoughtType {
    Analysis,
    Planning,
    Inference,
    Reflection,
    Decision,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Understanding,
    Planning,
    Execution,
    Generation,
}

/// One proposed step of a plan: a tool name and its parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlannedStep {
    pub tool: String,
    pub params: serde_json::Value,
}

/// Structured decision payload carried by PLANNING and DECISION thoughts:
/// a tool the thought resolves to invoke next, if any, plus any further
/// steps already identified by planning.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub next: Option<PlannedStep>,
    #[serde(default)]
    pub remaining: Vec<PlannedStep>,
}

/// A reasoning artifact: never mutated after emission.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Thought {
    pub id: Uuid,
    pub thought_type: ThoughtType,
    pub phase: Phase,
    pub content: String,
    pub confidence: f32,
    #[serde(default)]
    pub decision: Option<Decision>,
}

impl Thought {
    pub fn new(thought_type: ThoughtType, phase: Phase, content: impl Into<String>, confidence: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            thought_type,
            phase,
            content: content.into(),
            confidence: confidence.clamp(0.0, 1.0),
            decision: None,
        }
    }

    pub fn with_decision(mut self, decision: Decision) -> Self {
        self.decision = Some(decision);
        self
    }

    /// True when this thought carries a decision that resolves to a tool call.
    pub fn has_tool_decision(&self) -> bool {
        self.decision.as_ref().is_some_and(|d| d.next.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_is_clamped_into_unit_interval() {
        let t = Thought::new(ThoughtType::Planning, Phase::Planning, "plan", 1.5);
        assert_eq!(t.confidence, 1.0);
        let t2 = Thought::new(ThoughtType::Planning, Phase::Planning, "plan", -0.5);
        assert_eq!(t2.confidence, 0.0);
    }

    #[test]
    fn has_tool_decision_reflects_decision_payload() {
        let bare = Thought::new(ThoughtType::Inference, Phase::Execution, "thinking", 0.5);
        assert!(!bare.has_tool_decision());

        let with_tool = bare.with_decision(Decision {
            next: Some(PlannedStep { tool: "search_cities".into(), params: serde_json::json!({}) }),
            remaining: vec![],
        });
        assert!(with_tool.has_tool_decision());
    }
}
