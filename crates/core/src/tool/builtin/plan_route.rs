use async_trait::async_trait;

use crate::tool::{Tool, ToolDescriptor};

pub struct PlanRouteTool;

#[async_trait]
impl Tool for PlanRouteTool {
    fn name(&self) -> &str {
        "plan_route"
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: "Orders a list of cities into a suggested visiting route.".into(),
            required_params: vec!["cities".into()],
            timeout_ms: 2000,
            terminal: false,
        }
    }

    async fn execute(&self, params: serde_json::Value) -> Result<serde_json::Value, String> {
        let Some(cities) = params.get("cities").and_then(|v| v.as_array()) else {
            return Err("'cities' must be an array of strings".into());
        };
        let mut ordered: Vec<String> = cities.iter().filter_map(|v| v.as_str().map(str::to_string)).collect();
        if ordered.is_empty() {
            return Err("'cities' must not be empty".into());
        }
        ordered.sort();
        Ok(serde_json::json!({ "route": ordered }))
    }
}
