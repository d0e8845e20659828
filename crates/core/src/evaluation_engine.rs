//! Evaluation Engine: the stateless component that turns an Action into
//! an Evaluation. [`Evaluation::from_action`] already holds the actual
//! rule; this type exists so the engine is addressable the same way as
//! the Thought Engine, with no state of its own to hold.

use crate::action::Action;
use crate::evaluation::Evaluation;

#[derive(Default)]
pub struct EvaluationEngine;

impl EvaluationEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(&self, action: &Action) -> Evaluation {
        Evaluation::from_action(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_delegates_to_evaluation_from_action() {
        let engine = EvaluationEngine::new();
        let mut action = Action::pending("search_cities", serde_json::json!({}));
        action.start();
        action.succeed(serde_json::json!({"cities": ["Kyoto"]}));
        let evaluation = engine.evaluate(&action);
        assert!(evaluation.success);
    }
}
