use crate::agent::tools::Tool;
use crate::runtime::Runtime;
use async_trait::async_trait;
use serde_json::Value;

/// Runs tools in-process.
pub struct LocalRuntime {
    tools: Vec<Box<dyn Tool>>,
}

impl LocalRuntime {
    pub fn new(tools: Vec<Box<dyn Tool>>) -> Self {
        Self { tools }
    }
}

#[async_trait]
impl Runtime for LocalRuntime {
    fn tools(&self) -> &[Box<dyn Tool>] {
        &self.tools
    }

    async fn execute(&self, action: &str, args: Value) -> Result<String, String> {
        if let Some(tool) = self.tools.iter().find(|t| t.name() == action) {
            tool.call(args).await
        } else {
            Err(format!("Tool {} not found", action))
        }
    }
}
