//! Tool Registry: the set of callable tools a task's ReAct Loop can plan
//! against. Tools are registered once at startup and never mutated
//! afterward, so lookups need no locking.

mod registry;

pub mod builtin;

pub use registry::ToolRegistry;

use async_trait::async_trait;

/// Description of one tool's name, purpose, and expected parameters, as
/// surfaced to the Thought Engine when it builds a planning prompt.
#[derive(Clone, Debug, serde::Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub required_params: Vec<String>,
    pub timeout_ms: u64,
    /// Whether a success from this tool satisfies the loop's stop predicate.
    pub terminal: bool,
}

/// Why a tool call did not succeed, distinguishing registry-detected
/// failures (unknown tool, missing parameter, deadline exceeded) from a
/// failure the tool itself reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NotFound,
    InvalidParams,
    ExecutionError,
    Timeout,
}

/// Outcome of one call through the registry. Always a value, never an
/// `Err` — a failed tool call is ordinary loop data to reflect on, not an
/// exceptional condition.
#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExecutionResult {
    Success { value: serde_json::Value },
    Failure { kind: FailureKind, message: String },
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Success { .. })
    }

    pub fn value(&self) -> Option<&serde_json::Value> {
        match self {
            ExecutionResult::Success { value } => Some(value),
            ExecutionResult::Failure { .. } => None,
        }
    }
}

/// One callable tool. Implementations hold whatever in-memory domain data
/// they serve (e.g. a city catalog) and must tolerate concurrent calls.
/// `execute` returns `Err` only for a failure the tool itself detected
/// (e.g. malformed parameter content); the registry is responsible for
/// unknown-tool, missing-required-parameter, and timeout failures, which
/// never reach a tool's `execute`.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn descriptor(&self) -> ToolDescriptor;
    async fn execute(&self, params: serde_json::Value) -> Result<serde_json::Value, String>;
}
