use async_trait::async_trait;

use crate::tool::{Tool, ToolDescriptor};

const ATTRACTIONS: &[(&str, &[&str])] = &[
    ("Kyoto", &["Fushimi Inari Shrine", "Kinkaku-ji", "Nishiki Market"]),
    ("Hangzhou", &["West Lake", "Lingyin Temple"]),
    ("Reykjavik", &["Hallgrimskirkja", "Blue Lagoon"]),
    ("Lisbon", &["Belem Tower", "Alfama district"]),
    ("Marrakech", &["Jemaa el-Fnaa", "Majorelle Garden"]),
];

pub struct GetAttractionsTool;

impl GetAttractionsTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GetAttractionsTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for GetAttractionsTool {
    fn name(&self) -> &str {
        "get_attractions"
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: "Lists notable attractions for a named city.".into(),
            required_params: vec!["city".into()],
            timeout_ms: 2000,
            terminal: false,
        }
    }

    async fn execute(&self, params: serde_json::Value) -> Result<serde_json::Value, String> {
        let Some(city) = params.get("city").and_then(|v| v.as_str()) else {
            return Err("'city' must be a string".into());
        };
        match ATTRACTIONS.iter().find(|(name, _)| name.eq_ignore_ascii_case(city)) {
            Some((_, attractions)) => Ok(serde_json::json!({ "attractions": attractions })),
            None => Err(format!("no attraction data for '{city}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn known_city_returns_attractions() {
        let tool = GetAttractionsTool::new();
        let value = tool.execute(serde_json::json!({"city": "kyoto"})).await.unwrap();
        assert!(value["attractions"].as_array().unwrap().contains(&serde_json::json!("Kinkaku-ji")));
    }

    #[tokio::test]
    async fn unknown_city_fails_with_message() {
        let tool = GetAttractionsTool::new();
        let err = tool.execute(serde_json::json!({"city": "Atlantis"})).await.unwrap_err();
        assert!(err.contains("Atlantis"));
    }
}
