use crate::error::LlmError;
use crate::events::FunctionCall;
use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatRequest};
use serde::Deserialize;
use std::env;

/// Anything that can answer a chat request, optionally asking for tool calls.
#[async_trait]
pub trait Model: Send + Sync {
    fn name(&self) -> &str;

    async fn completion(
        &self,
        messages: Vec<ChatMessage>,
        tools: Option<Vec<genai::chat::Tool>>,
    ) -> Result<LLMResponse, LlmError>;
}

#[derive(Clone)]
pub struct LLM {
    pub model: String,
    pub client: Client,
    pub api_key: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct LLMConfig {
    pub model: String,
    pub api_key: Option<String>,
}

impl LLMConfig {
    /// Strips a `provider/` routing prefix (`anthropic/claude-3-5-sonnet-latest`);
    /// genai picks the adapter from the bare model name.
    pub fn model_name(&self) -> &str {
        match self.model.split_once('/') {
            Some((_, name)) if !name.is_empty() => name,
            _ => &self.model,
        }
    }
}

impl LLM {
    pub fn new(config: LLMConfig) -> Self {
        let model = config.model_name().to_string();

        if let Some(key) = &config.api_key {
            let var = if model.starts_with("gpt") {
                Some("OPENAI_API_KEY")
            } else if model.starts_with("claude") {
                Some("ANTHROPIC_API_KEY")
            } else {
                None
            };
            if let Some(var) = var {
                if env::var(var).is_err() {
                    unsafe {
                        env::set_var(var, key);
                    }
                }
            }
        }

        Self {
            model,
            client: Client::default(),
            api_key: config.api_key,
        }
    }
}

#[async_trait]
impl Model for LLM {
    fn name(&self) -> &str {
        &self.model
    }

    async fn completion(
        &self,
        messages: Vec<ChatMessage>,
        tools: Option<Vec<genai::chat::Tool>>,
    ) -> Result<LLMResponse, LlmError> {
        let mut chat_req = ChatRequest::new(messages);

        if let Some(t) = tools {
            chat_req = chat_req.with_tools(t);
        }

        tracing::debug!("Sending chat request to {}", self.model);
        let output = self.client.exec_chat(&self.model, chat_req, None).await?;

        let text: String = output.content.texts().join("");
        let tool_calls: Vec<FunctionCall> = output
            .tool_calls()
            .iter()
            .map(|t| FunctionCall {
                id: t.call_id.clone(),
                name: t.fn_name.clone(),
                args: t.fn_arguments.clone(),
            })
            .collect();

        Ok(LLMResponse {
            content: text,
            tool_calls,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct LLMResponse {
    pub content: String,
    pub tool_calls: Vec<FunctionCall>,
}
