use async_trait::async_trait;

use crate::tool::{Tool, ToolDescriptor};

/// Records a session-scoped preference note. The note itself is handed
/// back as the result value; persisting it into the session's message
/// log or elsewhere is the caller's responsibility — this tool has no
/// storage of its own, matching the other builtins' statelessness.
pub struct UpdatePreferenceTool;

#[async_trait]
impl Tool for UpdatePreferenceTool {
    fn name(&self) -> &str {
        "update_preference"
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: "Records a named travel preference for the current session.".into(),
            required_params: vec!["key".into(), "value".into()],
            timeout_ms: 1000,
            terminal: false,
        }
    }

    async fn execute(&self, params: serde_json::Value) -> Result<serde_json::Value, String> {
        let (Some(key), Some(value)) = (
            params.get("key").and_then(|v| v.as_str()),
            params.get("value").and_then(|v| v.as_str()),
        ) else {
            return Err("'key' and 'value' must both be strings".into());
        };
        Ok(serde_json::json!({ "key": key, "value": value, "recorded": true }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_key_and_value() {
        let tool = UpdatePreferenceTool;
        let value = tool.execute(serde_json::json!({"key": "budget", "value": "moderate"})).await.unwrap();
        assert_eq!(value["recorded"], true);
    }

    #[tokio::test]
    async fn non_string_value_fails() {
        let tool = UpdatePreferenceTool;
        assert!(tool.execute(serde_json::json!({"key": "budget", "value": 42})).await.is_err());
    }
}
