//! LLM capability: a callable that turns a message history into assistant
//! text. The Thought Engine depends only on the [`LlmClient`] trait, so
//! it can run against a deterministic mock in tests and a real provider
//! in production without any other change.
//!
//! # Streaming
//!
//! `invoke_stream` accepts an optional chunk sender; callers that don't
//! need token-by-token output pass `None` and get the same result as
//! `invoke`. The default implementation calls `invoke` and sends the
//! whole response as a single chunk, so a client only has to override it
//! when it can genuinely stream from its provider.

mod mock;
mod openai;

pub use mock::MockLlm;
pub use openai::ChatOpenAI;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::AgentError;
use crate::message::Message;

/// One chunk of assistant text as it streams in.
#[derive(Clone, Debug)]
pub struct MessageChunk {
    pub content: String,
}

/// Token usage for one completion call, when the provider reports it.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct LlmUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Result of one completion call: assistant text plus optional usage.
#[derive(Clone, Debug)]
pub struct LlmResponse {
    pub content: String,
    pub usage: Option<LlmUsage>,
}

/// A chat completion provider. The Thought Engine calls `invoke`/`invoke_stream`
/// to turn a message history (system prompt + conversation + scratch-pad
/// notes) into the next piece of reasoning or the final answer text.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError>;

    /// Streaming variant. When `chunk_tx` is `Some`, implementations that
    /// can stream send [`MessageChunk`]s as they arrive; the full response
    /// is still returned at the end so callers never have to reassemble
    /// content from the channel themselves.
    async fn invoke_stream(
        &self,
        messages: &[Message],
        chunk_tx: Option<mpsc::Sender<MessageChunk>>,
    ) -> Result<LlmResponse, AgentError> {
        let response = self.invoke(messages).await?;
        if let Some(tx) = chunk_tx {
            if !response.content.is_empty() {
                let _ = tx.send(MessageChunk { content: response.content.clone() }).await;
            }
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubLlm {
        content: String,
    }

    #[async_trait]
    impl LlmClient for StubLlm {
        async fn invoke(&self, _messages: &[Message]) -> Result<LlmResponse, AgentError> {
            Ok(LlmResponse { content: self.content.clone(), usage: None })
        }
    }

    #[tokio::test]
    async fn default_invoke_stream_sends_one_chunk_with_full_content() {
        let llm = StubLlm { content: "hello there".to_string() };
        let (tx, mut rx) = mpsc::channel(2);
        let resp = llm.invoke_stream(&[], Some(tx)).await.unwrap();
        assert_eq!(resp.content, "hello there");
        let chunk = rx.recv().await.expect("one chunk");
        assert_eq!(chunk.content, "hello there");
    }

    #[tokio::test]
    async fn default_invoke_stream_sends_nothing_for_empty_content() {
        let llm = StubLlm { content: String::new() };
        let (tx, mut rx) = mpsc::channel(2);
        let resp = llm.invoke_stream(&[], Some(tx)).await.unwrap();
        assert!(resp.content.is_empty());
        assert!(rx.try_recv().is_err());
    }
}
