//! `wayfarer-core`: the ReAct orchestration engine. Tool registry,
//! thought/evaluation engines, the bounded ReAct loop, the mode
//! dispatcher, and the session store all live here as reusable,
//! test-covered library types; the RPC and HTTP processes are thin
//! wrappers that wire this crate to a transport.

pub mod action;
pub mod dispatcher;
pub mod error;
pub mod evaluation;
pub mod evaluation_engine;
pub mod history;
pub mod llm;
pub mod memory;
pub mod message;
pub mod observation;
pub mod react;
pub mod session;
pub mod thought;
pub mod thought_engine;
pub mod tool;

pub use action::{Action, ActionStatus};
pub use dispatcher::{DispatchResult, Mode, ModeDispatcher, Turn};
pub use error::AgentError;
pub use evaluation::Evaluation;
pub use evaluation_engine::EvaluationEngine;
pub use history::HistoryStep;
pub use llm::{ChatOpenAI, LlmClient, LlmResponse, LlmUsage, MessageChunk, MockLlm};
pub use memory::ShortTermMemory;
pub use message::{Message, Role};
pub use observation::Observation;
pub use react::{ReactConfig, ReactLoop, ReactOutcome, StopReason};
pub use session::{Session, SessionError, SessionPatch, SessionStore};
pub use thought::{Decision, Phase, PlannedStep, Thought, ThoughtType};
pub use thought_engine::ThoughtEngine;
pub use tool::{ExecutionResult, FailureKind, Tool, ToolDescriptor, ToolRegistry};
