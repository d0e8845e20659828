use async_trait::async_trait;

use crate::tool::{Tool, ToolDescriptor};

/// (city, interest tags) pairs backing `search_cities`.
const CATALOG: &[(&str, &[&str])] = &[
    ("Kyoto", &["history", "food", "temples"]),
    ("Hangzhou", &["nature", "food", "history"]),
    ("Reykjavik", &["nature", "adventure"]),
    ("Lisbon", &["food", "beach", "history"]),
    ("Marrakech", &["food", "shopping", "history"]),
];

pub struct SearchCitiesTool;

impl SearchCitiesTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SearchCitiesTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for SearchCitiesTool {
    fn name(&self) -> &str {
        "search_cities"
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: "Finds candidate cities matching a list of travel interests.".into(),
            required_params: vec!["interests".into()],
            timeout_ms: 2000,
            terminal: false,
        }
    }

    async fn execute(&self, params: serde_json::Value) -> Result<serde_json::Value, String> {
        let interests: Vec<String> = match params.get("interests").and_then(|v| v.as_array()) {
            Some(values) => values.iter().filter_map(|v| v.as_str().map(str::to_lowercase)).collect(),
            None => return Err("'interests' must be an array of strings".into()),
        };
        if interests.is_empty() {
            return Err("'interests' must not be empty".into());
        }

        let matches: Vec<&str> = CATALOG
            .iter()
            .filter(|(_, tags)| interests.iter().any(|i| tags.contains(&i.as_str())))
            .map(|(city, _)| *city)
            .collect();

        Ok(serde_json::json!({ "cities": matches }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn matches_cities_by_any_shared_interest() {
        let tool = SearchCitiesTool::new();
        let value = tool.execute(serde_json::json!({"interests": ["nature"]})).await.unwrap();
        let cities = value["cities"].as_array().unwrap();
        assert!(cities.iter().any(|c| c == "Hangzhou"));
        assert!(cities.iter().any(|c| c == "Reykjavik"));
    }

    #[tokio::test]
    async fn empty_interests_fails() {
        let tool = SearchCitiesTool::new();
        assert!(tool.execute(serde_json::json!({"interests": []})).await.is_err());
    }

    #[tokio::test]
    async fn non_array_interests_fails() {
        let tool = SearchCitiesTool::new();
        assert!(tool.execute(serde_json::json!({"interests": "nature"})).await.is_err());
    }
}
