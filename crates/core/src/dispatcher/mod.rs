//! Mode Dispatcher: selects Direct / ReAct / Plan execution strategy for
//! one user turn and owns the streaming callback contract. Every mode
//! emits `session_id` first, zero or more reasoning/answer events, and
//! exactly one terminal `done`.

mod direct;
mod plan_mode;
mod react_mode;

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use wayfarer_protocol::{Chunk, DoneStats};

use crate::history::HistoryStep;
use crate::llm::LlmClient;
use crate::message::Message;
use crate::react::ReactConfig;
use crate::tool::ToolRegistry;

/// One user turn handed to the dispatcher: the session it belongs to (a
/// trace label only — the dispatcher itself holds no session state), the
/// new input, and the conversation so far.
pub struct Turn {
    pub session_id: String,
    pub user_input: String,
    pub context: Vec<Message>,
}

/// Execution strategy selected per turn, default `React`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    Direct,
    #[default]
    React,
    Plan,
}

/// Outcome of one `dispatch` call, independent of how its events were
/// transported (RPC response fields, or folded into a buffering callback).
#[derive(Clone, Debug)]
pub struct DispatchResult {
    pub answer: String,
    pub total_steps: u32,
    pub tools_used: Vec<String>,
    pub success: bool,
    /// Empty for Direct mode; the ReAct Loop's own record for ReAct mode;
    /// one synthesized entry per executed plan step for Plan mode.
    pub history: Vec<HistoryStep>,
}

/// Sends `chunk` and reports whether the consumer is still listening.
/// A closed channel is the backpressure contract's cancellation signal:
/// callers stop doing further work rather than treating it as an error.
pub(crate) async fn emit(tx: &mpsc::Sender<Chunk>, chunk: Chunk) -> bool {
    tx.send(chunk).await.is_ok()
}

pub struct ModeDispatcher {
    llm: Arc<dyn LlmClient>,
    tools: Arc<ToolRegistry>,
    react_config: ReactConfig,
}

impl ModeDispatcher {
    pub fn new(llm: Arc<dyn LlmClient>, tools: Arc<ToolRegistry>, react_config: ReactConfig) -> Self {
        Self { llm, tools, react_config }
    }

    /// Runs `turn` under `mode`, emitting every `Chunk` onto `emit_tx` as it
    /// becomes available. `cancel`, if given, is only consulted by ReAct
    /// and Plan mode — Direct mode has no suspension point finer than the
    /// single LLM stream it drives.
    pub async fn dispatch(
        &self,
        mode: Mode,
        turn: &Turn,
        cancel: Option<CancellationToken>,
        emit_tx: mpsc::Sender<Chunk>,
    ) -> DispatchResult {
        if !emit(&emit_tx, Chunk::SessionId { session_id: turn.session_id.clone() }).await {
            return DispatchResult { answer: String::new(), total_steps: 0, tools_used: vec![], success: false, history: vec![] };
        }

        let result = match mode {
            Mode::Direct => direct::run(&self.llm, turn, &emit_tx).await,
            Mode::React => react_mode::run(&self.llm, &self.tools, &self.react_config, turn, cancel, &emit_tx).await,
            Mode::Plan => plan_mode::run(&self.llm, &self.tools, &self.react_config, turn, cancel, &emit_tx).await,
        };

        let stats = DoneStats { total_steps: result.total_steps, tools_used: result.tools_used.clone(), success: result.success };
        emit(&emit_tx, Chunk::Done { stats }).await;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlm;
    use crate::tool::builtin;

    fn registry() -> Arc<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        builtin::register_all(&mut registry);
        Arc::new(registry)
    }

    async fn drain(mut rx: mpsc::Receiver<Chunk>) -> Vec<Chunk> {
        let mut out = Vec::new();
        while let Some(chunk) = rx.recv().await {
            out.push(chunk);
        }
        out
    }

    #[tokio::test]
    async fn direct_mode_emits_session_id_first_and_done_last() {
        let llm = Arc::new(MockLlm::fixed("你好！"));
        let dispatcher = ModeDispatcher::new(llm, registry(), ReactConfig::default());
        let (tx, rx) = mpsc::channel(16);
        let turn = Turn { session_id: "s1".into(), user_input: "你好".into(), context: vec![] };
        let task = tokio::spawn(async move { dispatcher.dispatch(Mode::Direct, &turn, None, tx).await });
        let chunks = drain(rx).await;
        let result = task.await.unwrap();

        assert!(matches!(chunks.first(), Some(Chunk::SessionId { .. })));
        assert!(matches!(chunks.last(), Some(Chunk::Done { .. })));
        assert!(result.tools_used.is_empty());
        assert!(result.success);
    }
}
