//! Builds an [`LlmClient`] for a bound model configuration entry.

use std::sync::Arc;

use async_openai::config::OpenAIConfig;
use wayfarer_config::{ModelConfig, Provider};
use wayfarer_core::{ChatOpenAI, LlmClient};

#[derive(Debug, thiserror::Error)]
pub enum BuildLlmError {
    #[error("provider {0:?} has no configured client")]
    UnsupportedProvider(Provider),
}

/// Only OpenAI and OpenAI-compatible endpoints are wired to an actual
/// client; Anthropic and Google entries pass config validation but are
/// rejected here until a client for them is added.
pub fn build_llm_client(model: &ModelConfig) -> Result<Arc<dyn LlmClient>, BuildLlmError> {
    match model.provider {
        Provider::Openai | Provider::OpenaiCompatible => {
            let mut config = OpenAIConfig::new().with_api_key(&model.api_key);
            if let Some(base) = &model.api_base {
                config = config.with_api_base(base);
            }
            let mut client = ChatOpenAI::with_config(config, model.model.clone());
            if let Some(temperature) = model.temperature {
                client = client.with_temperature(temperature);
            }
            Ok(Arc::new(client))
        }
        Provider::Anthropic | Provider::Google => Err(BuildLlmError::UnsupportedProvider(model.provider)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(provider: Provider) -> ModelConfig {
        ModelConfig {
            model_id: "m1".into(),
            name: "M1".into(),
            provider,
            model: "gpt-4o-mini".into(),
            api_base: None,
            api_key: "k".into(),
            api_version: None,
            temperature: Some(0.2),
            max_tokens: None,
            timeout: None,
            max_retries: None,
        }
    }

    #[test]
    fn openai_provider_builds_a_client() {
        assert!(build_llm_client(&model(Provider::Openai)).is_ok());
    }

    #[test]
    fn anthropic_provider_is_rejected_for_now() {
        let err = build_llm_client(&model(Provider::Anthropic)).unwrap_err();
        assert!(matches!(err, BuildLlmError::UnsupportedProvider(Provider::Anthropic)));
    }
}
