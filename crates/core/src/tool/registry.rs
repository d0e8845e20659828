use std::collections::HashMap;
use std::time::Duration;

use crate::tool::{ExecutionResult, FailureKind, Tool, ToolDescriptor};

/// Registry of tools a task may call, keyed by name. Built once at
/// startup via [`ToolRegistry::register`]; reads need no locking since
/// the map is never mutated once the loop starts executing tasks.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: HashMap::new() }
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn list(&self) -> Vec<ToolDescriptor> {
        self.tools.values().map(|t| t.descriptor()).collect()
    }

    pub fn describe(&self, name: &str) -> Option<ToolDescriptor> {
        self.tools.get(name).map(|t| t.descriptor())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Whether `name` names a registered terminal tool, used by the loop's
    /// stop predicate. Unknown names are not terminal.
    pub fn is_terminal(&self, name: &str) -> bool {
        self.tools.get(name).is_some_and(|t| t.descriptor().terminal)
    }

    /// Validates required parameters are present, then executes the tool
    /// under its declared deadline. Never returns `Err`: an unknown tool,
    /// missing parameter, or timeout all become an `ExecutionResult::Failure`
    /// with the matching [`FailureKind`], exactly as a tool-level failure
    /// would, so the loop records one uniform outcome shape regardless of
    /// where the failure originated.
    pub async fn execute(&self, name: &str, params: serde_json::Value) -> ExecutionResult {
        let Some(tool) = self.tools.get(name) else {
            return ExecutionResult::Failure { kind: FailureKind::NotFound, message: format!("unknown tool: {name}") };
        };
        let descriptor = tool.descriptor();

        let missing = match params.as_object() {
            Some(object) => descriptor.required_params.iter().find(|p| !object.contains_key(p.as_str())),
            None => descriptor.required_params.first(),
        };
        if let Some(param) = missing {
            return ExecutionResult::Failure {
                kind: FailureKind::InvalidParams,
                message: format!("missing required parameter '{param}' for tool '{name}'"),
            };
        }

        match tokio::time::timeout(Duration::from_millis(descriptor.timeout_ms), tool.execute(params)).await {
            Err(_) => ExecutionResult::Failure { kind: FailureKind::Timeout, message: format!("tool '{name}' exceeded its timeout") },
            Ok(Err(message)) => ExecutionResult::Failure { kind: FailureKind::ExecutionError, message },
            Ok(Ok(value)) => ExecutionResult::Success { value },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn descriptor(&self) -> ToolDescriptor {
            ToolDescriptor {
                name: "echo".into(),
                description: "echoes its 'text' parameter".into(),
                required_params: vec!["text".into()],
                timeout_ms: 1000,
                terminal: false,
            }
        }

        async fn execute(&self, params: serde_json::Value) -> Result<serde_json::Value, String> {
            Ok(params)
        }
    }

    struct SlowTool;

    #[async_trait]
    impl Tool for SlowTool {
        fn name(&self) -> &str {
            "slow"
        }

        fn descriptor(&self) -> ToolDescriptor {
            ToolDescriptor { name: "slow".into(), description: "never responds in time".into(), required_params: vec![], timeout_ms: 10, terminal: false }
        }

        async fn execute(&self, _params: serde_json::Value) -> Result<serde_json::Value, String> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(serde_json::json!({}))
        }
    }

    struct FailingTool;

    #[async_trait]
    impl Tool for FailingTool {
        fn name(&self) -> &str {
            "failing"
        }

        fn descriptor(&self) -> ToolDescriptor {
            ToolDescriptor { name: "failing".into(), description: "always fails".into(), required_params: vec![], timeout_ms: 1000, terminal: false }
        }

        async fn execute(&self, _params: serde_json::Value) -> Result<serde_json::Value, String> {
            Err("downstream unavailable".to_string())
        }
    }

    fn registry_with(tools: Vec<Box<dyn Tool>>) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        for tool in tools {
            registry.register(tool);
        }
        registry
    }

    #[tokio::test]
    async fn execute_unknown_tool_reports_not_found() {
        let registry = ToolRegistry::new();
        let result = registry.execute("ghost", serde_json::json!({})).await;
        assert!(matches!(result, ExecutionResult::Failure { kind: FailureKind::NotFound, .. }));
    }

    #[tokio::test]
    async fn execute_missing_required_param_is_rejected_before_running() {
        let registry = registry_with(vec![Box::new(EchoTool)]);
        let result = registry.execute("echo", serde_json::json!({})).await;
        assert!(matches!(result, ExecutionResult::Failure { kind: FailureKind::InvalidParams, .. }));
    }

    #[tokio::test]
    async fn execute_with_required_param_succeeds() {
        let registry = registry_with(vec![Box::new(EchoTool)]);
        let result = registry.execute("echo", serde_json::json!({"text": "hi"})).await;
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn execute_past_declared_timeout_is_reported_as_timeout() {
        let registry = registry_with(vec![Box::new(SlowTool)]);
        let result = registry.execute("slow", serde_json::json!({})).await;
        assert!(matches!(result, ExecutionResult::Failure { kind: FailureKind::Timeout, .. }));
    }

    #[tokio::test]
    async fn executor_failure_is_reported_as_execution_error() {
        let registry = registry_with(vec![Box::new(FailingTool)]);
        let result = registry.execute("failing", serde_json::json!({})).await;
        assert!(matches!(result, ExecutionResult::Failure { kind: FailureKind::ExecutionError, .. }));
    }

    #[test]
    fn is_terminal_reflects_descriptor_flag() {
        struct TerminalTool;
        #[async_trait]
        impl Tool for TerminalTool {
            fn name(&self) -> &str {
                "done"
            }
            fn descriptor(&self) -> ToolDescriptor {
                ToolDescriptor { name: "done".into(), description: "".into(), required_params: vec![], timeout_ms: 100, terminal: true }
            }
            async fn execute(&self, _params: serde_json::Value) -> Result<serde_json::Value, String> {
                Ok(serde_json::json!({}))
            }
        }
        let registry = registry_with(vec![Box::new(TerminalTool)]);
        assert!(registry.is_terminal("done"));
        assert!(!registry.is_terminal("echo"));
    }
}
