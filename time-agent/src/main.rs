mod config;
mod driver;

use crate::config::AppConfig;
use crate::driver::{AppContext, DriverError, run_blocking, run_examples};
use std::io;
use std::sync::Arc;
use time_agent_sdk::llm::LLM;
use time_agent_sdk::reporter::EventReporter;

async fn run(config: AppConfig, model: Arc<LLM>) -> anyhow::Result<()> {
    let ctx = AppContext::build(&config, model).await?;
    tracing::info!(
        "Runner ready for app {} (user {}, session {})",
        ctx.runner().app_name(),
        config.user_id,
        config.session_id
    );

    let mut reporter = EventReporter::new(io::stdout());
    run_examples(&ctx, &mut reporter).await;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    time_agent_sdk::logger::init_logging();

    let config = AppConfig::from_env();
    if config.llm.api_key.is_none() {
        tracing::warn!("ANTHROPIC_API_KEY is not set; model calls will fail");
    }
    // Built before any runtime thread exists: LLM::new may export the API key to the environment.
    let model = Arc::new(LLM::new(config.llm.clone()));

    match run_blocking(run(config, model)) {
        Ok(result) => result,
        Err(DriverError::NestedRuntime) => {
            println!("\nRunning inside an existing tokio runtime.");
            println!("Please await `run_examples(&ctx, &mut reporter)` from that runtime instead.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
