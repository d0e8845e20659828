//! The `Chunk` wire type: the single tagged union emitted over every stream,
//! from the ReAct loop through the RPC surface to SSE.

use serde::{Deserialize, Serialize};

/// Stats attached to the terminal `done` chunk.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DoneStats {
    pub total_steps: u32,
    pub tools_used: Vec<String>,
    pub success: bool,
}

/// One element of the ordered stream emitted to a client.
///
/// `session_id` is always emitted first and exactly once; `done` always
/// terminates the stream exactly once, whether the task succeeded, failed,
/// or was cancelled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Chunk {
    SessionId { session_id: String },
    ReasoningStart,
    ReasoningChunk { text: String },
    ReasoningEnd,
    AnswerStart,
    AnswerChunk { text: String },
    Heartbeat { ts: i64 },
    Error { message: String },
    Done { stats: DoneStats },
}

impl Chunk {
    /// True for the variant that must terminate every stream exactly once.
    pub fn is_done(&self) -> bool {
        matches!(self, Chunk::Done { .. })
    }

    pub fn is_session_id(&self) -> bool {
        matches!(self, Chunk::SessionId { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_serializes_with_type_tag() {
        let c = Chunk::SessionId { session_id: "s1".into() };
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["type"], "session_id");
        assert_eq!(v["session_id"], "s1");
    }

    #[test]
    fn reasoning_chunk_round_trips() {
        let c = Chunk::ReasoningChunk { text: "thinking".into() };
        let s = serde_json::to_string(&c).unwrap();
        let back: Chunk = serde_json::from_str(&s).unwrap();
        assert_eq!(c, back);
    }

    #[test]
    fn done_is_done_and_others_are_not() {
        let done = Chunk::Done { stats: DoneStats::default() };
        assert!(done.is_done());
        assert!(!Chunk::AnswerStart.is_done());
    }
}
