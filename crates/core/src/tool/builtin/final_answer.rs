use async_trait::async_trait;

use crate::tool::{Tool, ToolDescriptor};

/// The declared terminal tool: its success satisfies the loop's stop
/// predicate. Echoes `text` back unchanged as the result value, which
/// becomes the task's final answer.
pub struct FinalAnswerTool;

#[async_trait]
impl Tool for FinalAnswerTool {
    fn name(&self) -> &str {
        "final_answer"
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: "Terminates the task, returning its argument as the final answer.".into(),
            required_params: vec!["text".into()],
            timeout_ms: 500,
            terminal: true,
        }
    }

    async fn execute(&self, params: serde_json::Value) -> Result<serde_json::Value, String> {
        let Some(text) = params.get("text").and_then(|v| v.as_str()) else {
            return Err("'text' must be a string".into());
        };
        Ok(serde_json::json!({ "text": text }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echoes_text_back() {
        let tool = FinalAnswerTool;
        let value = tool.execute(serde_json::json!({"text": "here is your itinerary"})).await.unwrap();
        assert_eq!(value["text"], "here is your itinerary");
    }

    #[tokio::test]
    async fn missing_text_fails() {
        let tool = FinalAnswerTool;
        assert!(tool.execute(serde_json::json!({})).await.is_err());
    }
}
