//! Protocol-level wire types shared by the Agent Service and the Gateway Service.
//!
//! This crate has no runtime dependencies beyond `serde`: it is deliberately
//! thin so both `wayfarer-core` (which produces `Chunk`s) and
//! `wayfarer-gateway` (which translates them into SSE) can depend on it
//! without pulling in tokio, axum, or tonic.

mod chunk;
mod rpc;

pub use chunk::{Chunk, DoneStats};
pub use rpc::{
    AgentRequest, AgentResponse, ContextMessage, ErrorResponse, HealthCheckRequest,
    HealthCheckResponse, MessageRequest, MessageResponse, ReasoningSummary, StreamChunk,
    StreamChunkResponse,
};
