//! Model configuration entries: one entry per bindable model id.

use serde::{Deserialize, Serialize};

/// LLM provider backing a model entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
    Openai,
    Anthropic,
    Google,
    OpenaiCompatible,
}

/// One entry of the model configuration file.
///
/// `model_id` is the key clients bind sessions to (`Session::model_id`);
/// `model` is the provider-side model name passed to the completion API.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model_id: String,
    pub name: String,
    pub provider: Provider,
    pub model: String,
    #[serde(default)]
    pub api_base: Option<String>,
    pub api_key: String,
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub max_retries: Option<u32>,
}
