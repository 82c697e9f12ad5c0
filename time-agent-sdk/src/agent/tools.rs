mod get_time;

pub use get_time::{GetTimeTool, TimeTools};

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> String;
    fn description(&self) -> String;
    fn parameters(&self) -> Value; // JSON Schema
    async fn call(&self, args: Value) -> Result<String, String>;
}

/// A namespace of tools. Implementors list every tool they expose, so an
/// agent can be handed the whole set without registering tools one by one.
pub trait ToolProvider {
    fn namespace(&self) -> &str;
    fn tools(&self) -> Vec<Box<dyn Tool>>;
}

/// Collects every tool a provider exposes, keeping the first tool seen for
/// each name.
pub fn discover_tools(provider: &dyn ToolProvider) -> Vec<Box<dyn Tool>> {
    let mut seen = HashSet::new();
    let mut tools = Vec::new();
    for tool in provider.tools() {
        let name = tool.name();
        if !seen.insert(name.clone()) {
            tracing::warn!(
                "Skipping duplicate tool '{}' in namespace '{}'",
                name,
                provider.namespace()
            );
            continue;
        }
        tools.push(tool);
    }
    tracing::debug!(
        "Discovered {} tool(s) in namespace '{}'",
        tools.len(),
        provider.namespace()
    );
    tools
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo(&'static str);

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> String {
            self.0.to_string()
        }
        fn description(&self) -> String {
            "echo".to_string()
        }
        fn parameters(&self) -> Value {
            serde_json::json!({"type": "object"})
        }
        async fn call(&self, args: Value) -> Result<String, String> {
            Ok(args.to_string())
        }
    }

    struct Dupes;

    impl ToolProvider for Dupes {
        fn namespace(&self) -> &str {
            "dupes"
        }
        fn tools(&self) -> Vec<Box<dyn Tool>> {
            vec![Box::new(Echo("a")), Box::new(Echo("b")), Box::new(Echo("a"))]
        }
    }

    #[test]
    fn discovers_time_tools() {
        let tools = discover_tools(&TimeTools);
        let names: Vec<String> = tools.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["get_time".to_string()]);
    }

    #[test]
    fn duplicate_names_are_dropped() {
        let tools = discover_tools(&Dupes);
        let names: Vec<String> = tools.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }
}
