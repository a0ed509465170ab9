use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use textflow_engine::{
    config::Config,
    llm::{LlmRouter, RetryConfig},
    metrics,
    server::Server,
    store::create_store,
    workflow::{StepExecutor, WorkflowRunner},
    Result,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::load()?;
    info!(
        addr = %config.server.addr,
        primary_configured = config.llm.primary_api_key.is_some(),
        fallback_configured = config.llm.fallback_api_key.is_some(),
        "loaded configuration"
    );

    metrics::register_metrics();

    // Initialize store
    let store = create_store(&config.database).await?;
    store.init().await?;

    // Initialize the LLM call layer and the engine
    let router = Arc::new(LlmRouter::from_config(&config.llm));
    let retry = RetryConfig {
        max_attempts: config.llm.max_attempts,
        backoff_base: Duration::from_millis(config.llm.backoff_base_ms),
    };
    let executor = Arc::new(StepExecutor::new(router, retry));
    let runner = Arc::new(WorkflowRunner::new(executor, store.clone()));

    // Initialize server
    let server = Server::new(&config.llm, runner, store);

    // Start server
    info!("Starting server on {}", config.server.addr);
    server.start(&config.server.addr).await?;

    Ok(())
}
