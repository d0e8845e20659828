//! HistoryStep: the append-only record of one loop iteration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::evaluation::Evaluation;
use crate::thought::{Phase, Thought};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryStep {
    pub step: usize,
    pub phase: Phase,
    pub thought: Thought,
    pub action: Option<Action>,
    pub evaluation: Option<Evaluation>,
    pub timestamp: DateTime<Utc>,
}

impl HistoryStep {
    pub fn new(
        step: usize,
        phase: Phase,
        thought: Thought,
        action: Option<Action>,
        evaluation: Option<Evaluation>,
    ) -> Self {
        Self { step, phase, thought, action, evaluation, timestamp: Utc::now() }
    }
}
