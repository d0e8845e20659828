//! Loads the model configuration file into a lookup table.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use crate::model::ModelConfig;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("read model config: {0}")]
    Read(std::io::Error),
    #[error("parse model config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("duplicate model_id: {0}")]
    Duplicate(String),
}

/// Document shape on disk: a TOML array of tables under `[[model]]`.
#[derive(Debug, serde::Deserialize)]
struct ModelFile {
    #[serde(default, rename = "model")]
    models: Vec<ModelConfig>,
}

/// In-memory lookup of `ModelConfig` by `model_id`, loaded once at startup.
///
/// **Interaction**: Built by [`ModelRegistry::load`] from a TOML file;
/// read by the Agent Service to resolve the `model_id` carried on each
/// `ProcessMessage`/`StreamMessage` request into provider/model/credentials.
#[derive(Debug, Default, Clone)]
pub struct ModelRegistry {
    models: HashMap<String, ModelConfig>,
}

impl ModelRegistry {
    /// Loads and validates a model configuration file.
    ///
    /// Fails on unparsable TOML or a repeated `model_id` (registration is
    /// not permitted to silently shadow an earlier entry).
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let raw = std::fs::read_to_string(path).map_err(LoadError::Read)?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, LoadError> {
        let file: ModelFile = toml::from_str(raw)?;
        let mut models = HashMap::with_capacity(file.models.len());
        for entry in file.models {
            if models.insert(entry.model_id.clone(), entry.clone()).is_some() {
                return Err(LoadError::Duplicate(entry.model_id));
            }
        }
        Ok(Self { models })
    }

    pub fn get(&self, model_id: &str) -> Option<&ModelConfig> {
        self.models.get(model_id)
    }

    pub fn list(&self) -> Vec<&ModelConfig> {
        self.models.values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_MODELS: &str = r#"
        [[model]]
        model_id = "a"
        name = "A"
        provider = "openai"
        model = "gpt-4o-mini"
        api_key = "k"

        [[model]]
        model_id = "b"
        name = "B"
        provider = "anthropic"
        model = "claude-3-5-sonnet"
        api_key = "k2"
    "#;

    #[test]
    fn loads_and_looks_up_by_model_id() {
        let reg = ModelRegistry::parse(TWO_MODELS).unwrap();
        assert_eq!(reg.list().len(), 2);
        assert_eq!(reg.get("a").unwrap().name, "A");
        assert!(reg.get("missing").is_none());
    }

    #[test]
    fn duplicate_model_id_is_rejected() {
        let dup = r#"
            [[model]]
            model_id = "a"
            name = "A"
            provider = "openai"
            model = "gpt-4o-mini"
            api_key = "k"

            [[model]]
            model_id = "a"
            name = "A2"
            provider = "openai"
            model = "gpt-4o"
            api_key = "k"
        "#;
        let err = ModelRegistry::parse(dup).unwrap_err();
        assert!(matches!(err, LoadError::Duplicate(id) if id == "a"));
    }
}
