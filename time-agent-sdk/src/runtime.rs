use crate::agent::tools::Tool;
use async_trait::async_trait;
use serde_json::Value;

pub mod local;
pub use local::LocalRuntime;

/// Where the agent's tool calls are carried out.
///
/// The runtime owns the tools an agent may call and dispatches calls to them by name,
/// keeping the agent's decision making separate from execution.
#[async_trait]
pub trait Runtime: Send + Sync {
    /// List available tools that the agent can call in this runtime.
    fn tools(&self) -> &[Box<dyn Tool>];

    /// Execute a tool call.
    ///
    /// # Arguments
    /// * `action` - The name of the tool to execute (e.g., "get_time").
    /// * `args` - The arguments for the tool as a JSON Value.
    ///
    /// # Returns
    /// * `Ok(String)` - The output of the tool execution.
    /// * `Err(String)` - An error message if execution fails.
    async fn execute(&self, action: &str, args: Value) -> Result<String, String>;
}
