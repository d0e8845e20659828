//! Deterministic mock LLM for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse};
use crate::message::Message;

/// Returns a fixed sequence of responses, one per call, then repeats the
/// last entry for any call beyond the end of the sequence. Used to script
/// multi-step Thought Engine and ReAct Loop scenarios without a real
/// provider.
pub struct MockLlm {
    responses: Vec<String>,
    call_count: AtomicUsize,
    invocations: Mutex<Vec<String>>,
}

impl MockLlm {
    /// Returns `content` for every call.
    pub fn fixed(content: impl Into<String>) -> Self {
        Self::sequence(vec![content.into()])
    }

    /// Returns each entry of `responses` in order, one per call; the final
    /// entry repeats once the sequence is exhausted.
    pub fn sequence(responses: Vec<String>) -> Self {
        assert!(!responses.is_empty(), "MockLlm needs at least one response");
        Self { responses, call_count: AtomicUsize::new(0), invocations: Mutex::new(Vec::new()) }
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Snapshot of the last message's content for every call made, in order.
    pub fn invocations(&self) -> Vec<String> {
        self.invocations.lock().expect("mutex poisoned").clone()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        let n = self.call_count.fetch_add(1, Ordering::SeqCst);
        let content = self.responses.get(n).or_else(|| self.responses.last()).cloned().unwrap_or_default();
        if let Some(last) = messages.last() {
            self.invocations.lock().expect("mutex poisoned").push(last.content.clone());
        }
        Ok(LlmResponse { content, usage: None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_returns_same_content_every_call() {
        let llm = MockLlm::fixed("ok");
        assert_eq!(llm.invoke(&[]).await.unwrap().content, "ok");
        assert_eq!(llm.invoke(&[]).await.unwrap().content, "ok");
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn sequence_advances_then_repeats_last() {
        let llm = MockLlm::sequence(vec!["first".into(), "second".into()]);
        assert_eq!(llm.invoke(&[]).await.unwrap().content, "first");
        assert_eq!(llm.invoke(&[]).await.unwrap().content, "second");
        assert_eq!(llm.invoke(&[]).await.unwrap().content, "second");
    }

    #[tokio::test]
    async fn invocations_records_last_message_content() {
        let llm = MockLlm::fixed("ok");
        llm.invoke(&[Message::user("hello")]).await.unwrap();
        assert_eq!(llm.invocations(), vec!["hello".to_string()]);
    }
}
