//! Translates `ProcessMessage` / `StreamMessage` requests into a
//! [`ModeDispatcher`] run and its result back into wire responses.

use std::sync::Arc;

use tokio::sync::mpsc;
use wayfarer_config::ModelRegistry;
use wayfarer_core::{Message, Mode, ModeDispatcher, ReactConfig, ToolRegistry, Turn};
use wayfarer_protocol::{
    Chunk, ContextMessage, MessageRequest, MessageResponse, ReasoningSummary, StreamChunk,
    StreamChunkResponse,
};

use crate::llm_factory::build_llm_client;
use crate::response::ResponseSender;

pub(crate) struct Handler {
    tools: Arc<ToolRegistry>,
    models: Arc<ModelRegistry>,
    react_config: ReactConfig,
}

impl Handler {
    pub(crate) fn new(tools: Arc<ToolRegistry>, models: Arc<ModelRegistry>, react_config: ReactConfig) -> Self {
        Self { tools, models, react_config }
    }

    fn resolve_llm(&self, model_id: &str) -> Result<Arc<dyn wayfarer_core::LlmClient>, String> {
        let model = self
            .models
            .get(model_id)
            .ok_or_else(|| format!("unknown model_id: {model_id}"))?;
        build_llm_client(model).map_err(|e| e.to_string())
    }

    fn parse_mode(req: &MessageRequest) -> Mode {
        match req.mode.as_deref() {
            Some("direct") => Mode::Direct,
            Some("plan") => Mode::Plan,
            _ => Mode::React,
        }
    }

    fn build_turn(req: &MessageRequest) -> Turn {
        let context = req.context.iter().map(context_to_message).collect();
        Turn { session_id: req.session_id.clone(), user_input: req.user_input.clone(), context }
    }

    /// Runs the dispatcher to completion, buffering every emitted chunk,
    /// and returns the concatenated result as in `ProcessMessage`.
    pub(crate) async fn process_message(&self, req: MessageRequest) -> MessageResponse {
        if req.user_input.trim().is_empty() {
            return MessageResponse {
                success: false,
                answer: String::new(),
                reasoning: ReasoningSummary::default(),
                error: Some("user_input must not be empty".into()),
                history: vec![],
            };
        }

        let llm = match self.resolve_llm(&req.model_id) {
            Ok(llm) => llm,
            Err(error) => {
                return MessageResponse {
                    success: false,
                    answer: String::new(),
                    reasoning: ReasoningSummary::default(),
                    error: Some(error),
                    history: vec![],
                }
            }
        };

        let dispatcher = ModeDispatcher::new(llm, self.tools.clone(), self.react_config.clone());
        let mode = Self::parse_mode(&req);
        let turn = Self::build_turn(&req);
        let (tx, mut rx) = mpsc::channel::<Chunk>(64);

        let dispatch = tokio::spawn(async move { dispatcher.dispatch(mode, &turn, None, tx).await });

        let mut reasoning_lines = Vec::new();
        while let Some(chunk) = rx.recv().await {
            if let Chunk::ReasoningChunk { text } = chunk {
                reasoning_lines.push(text);
            }
        }

        let result = match dispatch.await {
            Ok(result) => result,
            Err(join_error) => {
                return MessageResponse {
                    success: false,
                    answer: String::new(),
                    reasoning: ReasoningSummary::default(),
                    error: Some(join_error.to_string()),
                    history: vec![],
                }
            }
        };

        let history = result
            .history
            .iter()
            .map(|step| serde_json::to_value(step).unwrap_or(serde_json::Value::Null))
            .collect();

        MessageResponse {
            success: result.success,
            answer: result.answer,
            reasoning: ReasoningSummary {
                text: reasoning_lines.join("\n"),
                total_steps: result.total_steps,
                tools_used: result.tools_used,
            },
            error: None,
            history,
        }
    }

    /// Runs the dispatcher, forwarding every chunk to `sender` as it is
    /// produced rather than buffering. Backpressure on `sender.send` is
    /// what slows the dispatcher down: a full downstream queue blocks the
    /// forwarding loop, which in turn blocks the dispatcher's own `emit`.
    pub(crate) async fn stream_message<S: ResponseSender>(
        &self,
        id: String,
        req: MessageRequest,
        sender: &mut S,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if req.user_input.trim().is_empty() {
            let chunk = StreamChunk::error("user_input must not be empty");
            sender
                .send(wayfarer_protocol::AgentResponse::StreamChunk(StreamChunkResponse { id, chunk }))
                .await?;
            return Ok(());
        }

        let llm = match self.resolve_llm(&req.model_id) {
            Ok(llm) => llm,
            Err(error) => {
                let chunk = StreamChunk::error(error);
                sender
                    .send(wayfarer_protocol::AgentResponse::StreamChunk(StreamChunkResponse { id, chunk }))
                    .await?;
                return Ok(());
            }
        };

        let dispatcher = ModeDispatcher::new(llm, self.tools.clone(), self.react_config.clone());
        let mode = Self::parse_mode(&req);
        let turn = Self::build_turn(&req);
        let (tx, mut rx) = mpsc::channel::<Chunk>(64);

        let dispatch = tokio::spawn(async move { dispatcher.dispatch(mode, &turn, None, tx).await });

        while let Some(chunk) = rx.recv().await {
            let Some(stream_chunk) = translate(&chunk) else { continue };
            let is_last = stream_chunk.is_last;
            sender
                .send(wayfarer_protocol::AgentResponse::StreamChunk(StreamChunkResponse {
                    id: id.clone(),
                    chunk: stream_chunk,
                }))
                .await?;
            if is_last {
                break;
            }
        }
        dispatch.abort();
        let _ = dispatch.await;
        Ok(())
    }
}

fn context_to_message(ctx: &ContextMessage) -> Message {
    match ctx.role.as_str() {
        "assistant" => Message::assistant(ctx.content.clone(), None),
        _ => Message::user(ctx.content.clone()),
    }
}

fn translate(chunk: &Chunk) -> Option<StreamChunk> {
    Some(match chunk {
        Chunk::SessionId { .. } | Chunk::Heartbeat { .. } => return None,
        Chunk::ReasoningStart => StreamChunk::thinking_start(),
        Chunk::ReasoningChunk { text } => StreamChunk::thinking_chunk(text.clone()),
        Chunk::ReasoningEnd => StreamChunk::thinking_end(),
        Chunk::AnswerStart => StreamChunk::answer_start(),
        Chunk::AnswerChunk { text } => StreamChunk::answer(text.clone()),
        Chunk::Error { message } => StreamChunk::error(message.clone()),
        Chunk::Done { stats } => StreamChunk::done(stats),
    })
}
