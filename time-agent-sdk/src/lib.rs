pub mod agent;
pub mod error;
pub mod events;
pub mod llm;
pub mod logger;
pub mod prompts;
pub mod reporter;
pub mod runner;
pub mod runtime;
pub mod session;

pub use genai;
