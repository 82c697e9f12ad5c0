use crate::config::AppConfig;
use std::future::Future;
use std::io::{self, Write};
use std::sync::Arc;
use thiserror::Error;
use time_agent_sdk::agent::tools::{TimeTools, discover_tools};
use time_agent_sdk::agent::{Agent, AgentConfig};
use time_agent_sdk::error::SessionError;
use time_agent_sdk::events::Content;
use time_agent_sdk::llm::Model;
use time_agent_sdk::prompts::{TIME_AGENT_DESCRIPTION, TIME_AGENT_INSTRUCTION, TIME_AGENT_NAME};
use time_agent_sdk::reporter::EventReporter;
use time_agent_sdk::runner::Runner;
use time_agent_sdk::session::InMemorySessionService;
use tokio::runtime::{Builder, Handle};

pub const EXAMPLE_QUERIES: [&str; 2] = ["time in nyc", "time at delhi"];

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("a tokio runtime is already running on this thread")]
    NestedRuntime,
    #[error("failed to start the tokio runtime: {0}")]
    Runtime(#[from] io::Error),
}

/// Everything a query needs: the runner plus the session it talks to.
pub struct AppContext {
    runner: Runner,
    user_id: String,
    session_id: String,
}

impl AppContext {
    /// Creates the session service and session, then the time agent and its runner.
    pub async fn build(config: &AppConfig, model: Arc<dyn Model>) -> Result<Self, SessionError> {
        let session_service = Arc::new(InMemorySessionService::new());
        session_service
            .create_session(&config.app_name, &config.user_id, &config.session_id)
            .await?;

        let agent = Agent::new(
            AgentConfig {
                name: TIME_AGENT_NAME.to_string(),
                description: TIME_AGENT_DESCRIPTION.to_string(),
                instruction: TIME_AGENT_INSTRUCTION.to_string(),
            },
            model,
            discover_tools(&TimeTools),
        );
        tracing::info!("Agent {} ready ({})", agent.name(), agent.description());

        Ok(Self {
            runner: Runner::new(Arc::new(agent), config.app_name.clone(), session_service),
            user_id: config.user_id.clone(),
            session_id: config.session_id.clone(),
        })
    }

    pub fn runner(&self) -> &Runner {
        &self.runner
    }
}

/// Sends one query and prints its trace; returns the final answer.
pub async fn call_agent<W: Write>(
    ctx: &AppContext,
    query: &str,
    reporter: &mut EventReporter<W>,
) -> String {
    let events = ctx
        .runner
        .run_async(&ctx.user_id, &ctx.session_id, Content::user_text(query));
    reporter.report(query, events).await
}

/// Runs the example queries one after another.
pub async fn run_examples<W: Write>(ctx: &AppContext, reporter: &mut EventReporter<W>) -> Vec<String> {
    let mut answers = Vec::with_capacity(EXAMPLE_QUERIES.len());
    for query in EXAMPLE_QUERIES {
        answers.push(call_agent(ctx, query, reporter).await);
    }
    answers
}

/// Runs `future` to completion on a fresh runtime.
///
/// Refuses with [`DriverError::NestedRuntime`] when called from inside a
/// running tokio runtime, where blocking would panic; await the future there
/// instead.
pub fn run_blocking<F: Future>(future: F) -> Result<F::Output, DriverError> {
    if Handle::try_current().is_ok() {
        return Err(DriverError::NestedRuntime);
    }
    let runtime = Builder::new_multi_thread().enable_all().build()?;
    Ok(runtime.block_on(future))
}
