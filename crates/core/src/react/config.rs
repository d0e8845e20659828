//! Configuration knobs for one [`super::ReactLoop`] run.

use std::time::Duration;

/// Bounds on one task's ReAct loop. Cloned into the loop at construction;
/// never mutated mid-task.
#[derive(Clone, Debug)]
pub struct ReactConfig {
    /// Hard ceiling on the number of outer loop iterations. The final
    /// iteration is reserved for a forced DECISION, so the loop acts at
    /// most `max_steps - 1` times.
    pub max_steps: usize,
    /// Ceiling on consecutive iterations that produce no tool call (a
    /// planning gap or a thought with no decision). Reaching it forces
    /// the stop predicate rather than letting the loop spin on pure
    /// reasoning with no progress.
    pub max_reasoning_depth: usize,
    /// Optional wall-clock budget for the whole task, checked once per
    /// iteration. Expiry ends the loop immediately with whatever partial
    /// history has accumulated.
    pub task_deadline: Option<Duration>,
}

impl Default for ReactConfig {
    fn default() -> Self {
        Self { max_steps: 10, max_reasoning_depth: 4, task_deadline: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_bounds() {
        let config = ReactConfig::default();
        assert_eq!(config.max_steps, 10);
        assert_eq!(config.max_reasoning_depth, 4);
        assert!(config.task_deadline.is_none());
    }
}
