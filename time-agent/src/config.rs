use std::env;
use time_agent_sdk::llm::LLMConfig;

pub const DEFAULT_MODEL: &str = "anthropic/claude-3-5-sonnet-latest";
pub const DEFAULT_APP_NAME: &str = "google_search_agent";
pub const DEFAULT_USER_ID: &str = "user1234";
pub const DEFAULT_SESSION_ID: &str = "1234";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm: LLMConfig,
    pub app_name: String,
    pub user_id: String,
    pub session_id: String,
}

impl AppConfig {
    /// Reads `AGENT_MODEL`, `ANTHROPIC_API_KEY`, `APP_NAME`, `USER_ID` and
    /// `SESSION_ID`, falling back to the demo defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            llm: LLMConfig {
                model: get("AGENT_MODEL", DEFAULT_MODEL),
                api_key: lookup("ANTHROPIC_API_KEY"),
            },
            app_name: get("APP_NAME", DEFAULT_APP_NAME),
            user_id: get("USER_ID", DEFAULT_USER_ID),
            session_id: get("SESSION_ID", DEFAULT_SESSION_ID),
        }
    }
}
