//! OpenAI Chat Completions client implementing [`LlmClient`].
//!
//! Uses `OPENAI_API_KEY` from the environment by default, or an explicit
//! [`OpenAIConfig`] for a compatible endpoint (`Provider::OpenaiCompatible`
//! model entries point `api_base` here).

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tracing::{debug, trace};

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestAssistantMessage, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage,
        CreateChatCompletionRequestArgs,
    },
    Client,
};

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse, LlmUsage, MessageChunk};
use crate::message::{Message, Role};

/// Chat Completions client for a single bound model.
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
    system_prompt: Option<String>,
    temperature: Option<f32>,
}

impl ChatOpenAI {
    pub fn new(model: impl Into<String>) -> Self {
        Self { client: Client::new(), model: model.into(), system_prompt: None, temperature: None }
    }

    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self { client: Client::with_config(config), model: model.into(), system_prompt: None, temperature: None }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn messages_to_request(&self, messages: &[Message]) -> Vec<ChatCompletionRequestMessage> {
        let mut request = Vec::with_capacity(messages.len() + 1);
        if let Some(system) = &self.system_prompt {
            request.push(ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessage::from(system.as_str()),
            ));
        }
        for m in messages {
            request.push(match m.role {
                Role::User => ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessage::from(m.content.as_str()),
                ),
                Role::Assistant => ChatCompletionRequestMessage::Assistant(
                    ChatCompletionRequestAssistantMessage::from(m.content.as_str()),
                ),
            });
        }
        request
    }
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(self.messages_to_request(messages));
        if let Some(t) = self.temperature {
            args.temperature(t);
        }
        let request = args
            .build()
            .map_err(|e| AgentError::LlmFailed(format!("request build failed: {e}")))?;

        debug!(model = %self.model, message_count = messages.len(), "openai chat create");

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AgentError::LlmFailed(format!("openai api error: {e}")))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::LlmFailed("openai returned no choices".to_string()))?;
        let content = choice.message.content.unwrap_or_default();
        let usage = response.usage.map(|u| LlmUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });
        trace!(content = %content, "openai response");
        Ok(LlmResponse { content, usage })
    }

    async fn invoke_stream(
        &self,
        messages: &[Message],
        chunk_tx: Option<mpsc::Sender<MessageChunk>>,
    ) -> Result<LlmResponse, AgentError> {
        let Some(chunk_tx) = chunk_tx else {
            return self.invoke(messages).await;
        };

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(self.messages_to_request(messages));
        args.stream(true);
        if let Some(t) = self.temperature {
            args.temperature(t);
        }
        let request = args
            .build()
            .map_err(|e| AgentError::LlmFailed(format!("request build failed: {e}")))?;

        debug!(model = %self.model, message_count = messages.len(), "openai chat create_stream");

        let mut stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(|e| AgentError::LlmFailed(format!("openai stream error: {e}")))?;

        let mut full_content = String::new();
        let mut usage = None;
        while let Some(result) = stream.next().await {
            let response = result.map_err(|e| AgentError::LlmFailed(format!("openai stream error: {e}")))?;
            if let Some(u) = response.usage {
                usage = Some(LlmUsage {
                    prompt_tokens: u.prompt_tokens,
                    completion_tokens: u.completion_tokens,
                    total_tokens: u.total_tokens,
                });
            }
            for choice in response.choices {
                if let Some(content) = &choice.delta.content {
                    if !content.is_empty() {
                        full_content.push_str(content);
                        let _ = chunk_tx.send(MessageChunk { content: content.clone() }).await;
                    }
                }
            }
        }

        Ok(LlmResponse { content: full_content, usage })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sets_model_with_no_system_prompt_or_temperature() {
        let client = ChatOpenAI::new("gpt-4o-mini");
        assert_eq!(client.model, "gpt-4o-mini");
        assert!(client.system_prompt.is_none());
        assert!(client.temperature.is_none());
    }

    #[test]
    fn builder_methods_set_system_prompt_and_temperature() {
        let client = ChatOpenAI::new("gpt-4o-mini")
            .with_system_prompt("you are a trip planner")
            .with_temperature(0.3);
        assert_eq!(client.system_prompt.as_deref(), Some("you are a trip planner"));
        assert_eq!(client.temperature, Some(0.3));
    }

    #[tokio::test]
    async fn invoke_against_unreachable_base_returns_error() {
        let config = OpenAIConfig::new().with_api_key("test-key").with_api_base("https://127.0.0.1:1");
        let client = ChatOpenAI::with_config(config, "gpt-4o-mini");
        let messages = [Message::user("hello")];
        let result = client.invoke(&messages).await;
        assert!(result.is_err());
    }
}
