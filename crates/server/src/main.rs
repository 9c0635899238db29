//! marksearch server entry point.
//!
//! Boots the MCP server on stdio transport and the background cache sweeper.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use anyhow::Result;
use marksearch_core::AppConfig;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod state;
mod sweeper;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(db_path = %config.db_path.display(), "Starting marksearch server on stdio transport");

    let eviction_interval = config.eviction_interval();
    let state = state::AppState::open(config).await?;
    let sweeper = sweeper::spawn(state.gateway.cache().clone(), state.content.clone(), eviction_interval);

    let handler = handler::MarksearchServer::new(state);
    let server = serve_server(handler, stdio()).await?;
    server.waiting().await?;

    sweeper.abort();
    tracing::info!("marksearch server stopped");

    Ok(())
}
