pub mod tools;

use crate::events::{Event, FunctionCall, FunctionResponse, Part, USER_AUTHOR};
use crate::llm::Model;
use crate::runtime::{LocalRuntime, Runtime};
use genai::chat::{ChatMessage, ChatRole, ContentPart, ToolCall, ToolResponse};
use std::sync::Arc;
use tools::Tool;

#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub name: String,
    pub description: String,
    pub instruction: String,
}

pub struct Agent {
    name: String,
    description: String,
    system_message: String,
    model: Arc<dyn Model>,
    runtime: LocalRuntime,
}

impl Agent {
    pub fn new(config: AgentConfig, model: Arc<dyn Model>, tools: Vec<Box<dyn Tool>>) -> Self {
        let system_message = format!("{}\n\n{}", config.description, config.instruction);
        Self {
            name: config.name,
            description: config.description,
            system_message,
            model,
            runtime: LocalRuntime::new(tools),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn model(&self) -> &dyn Model {
        self.model.as_ref()
    }

    pub fn runtime(&self) -> &dyn Runtime {
        &self.runtime
    }

    pub fn genai_tools(&self) -> Option<Vec<genai::chat::Tool>> {
        let tools: Vec<genai::chat::Tool> = self
            .runtime
            .tools()
            .iter()
            .map(|t| {
                genai::chat::Tool::new(t.name())
                    .with_description(t.description())
                    .with_schema(t.parameters())
            })
            .collect();

        if tools.is_empty() { None } else { Some(tools) }
    }

    /// Chat messages for a new invocation: the system message followed by the
    /// conversational turns of earlier invocations.
    ///
    /// Tool traffic from earlier invocations is left out; only the current
    /// invocation carries tool calls and their results.
    pub fn history_messages(&self, history: &[Event]) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(self.system_message.clone())];

        for event in history {
            if event.partial {
                continue;
            }
            for part in event.parts() {
                let text = match part {
                    Part::Text { text } if !text.trim().is_empty() => text.clone(),
                    Part::ExecutableCode { language, code } => {
                        format!("```{}\n{}\n```", language, code)
                    }
                    Part::CodeExecutionResult { outcome, output } => {
                        format!("Code execution result ({}):\n{}", outcome, output)
                    }
                    _ => continue,
                };
                if event.author == USER_AUTHOR {
                    messages.push(ChatMessage::user(text));
                } else {
                    messages.push(ChatMessage::assistant(text));
                }
            }
        }

        messages
    }
}

/// Assistant message replaying a model turn that requested tool calls.
pub(crate) fn tool_call_message(text: &str, calls: &[FunctionCall]) -> ChatMessage {
    let mut parts = vec![];
    if !text.is_empty() {
        parts.push(ContentPart::Text(text.to_string()));
    }
    for call in calls {
        parts.push(ContentPart::ToolCall(ToolCall {
            call_id: call.id.clone(),
            fn_name: call.name.clone(),
            fn_arguments: call.args.clone(),
        }));
    }
    ChatMessage {
        role: ChatRole::Assistant,
        content: parts.into(),
        options: None,
    }
}

pub(crate) fn tool_response_message(response: &FunctionResponse) -> ChatMessage {
    let content = match &response.response {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    ChatMessage::from(ToolResponse::new(response.id.clone(), content))
}
