//! Top-level error type for `wayfarer-core`.

use thiserror::Error;

/// Errors surfaced by the LLM capability, thought engine, and ReAct loop.
///
/// Tool errors do not appear here: they are carried as `ExecutionResult`
/// values, never as `Err`, so the loop can record and reflect on them
/// without unwinding.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("LLM call failed: {0}")]
    LlmFailed(String),
    #[error("invalid plan JSON: {0}")]
    PlanParse(String),
    #[error("execution failed: {0}")]
    ExecutionFailed(String),
    #[error("task cancelled")]
    Cancelled,
}
