//! Daemon entry point for the MongoDB MCP server.
//!
//! Loads configuration from the environment, establishes and validates the
//! database connection, and serves the MCP protocol over stdio or streamable
//! HTTP. The connection is closed exactly once on the way out.

mod config;

use std::sync::Arc;

use atlas_core::{AtlasConnection, AtlasOps};
use atlas_mcp::server::{McpHttpServerConfig, serve_stdio, serve_streamable_http};
use tracing_subscriber::EnvFilter;

use crate::config::AtlasConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = AtlasConfig::from_args()?;

    // stdout belongs to the MCP transport; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let connection = Arc::new(AtlasConnection::connect(&config.mongodb_uri).await?);
    let ops = Arc::new(AtlasOps::new(connection.clone()));

    let served = if config.mcp_http {
        let http =
            McpHttpServerConfig::new(config.mcp_http_addr).with_stateful_mode(config.http_stateful);
        tracing::info!(addr = %http.addr, "serving MCP over streamable HTTP");
        tokio::select! {
            result = serve_streamable_http(ops, http) => result,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupt received, shutting down");
                Ok(())
            }
        }
    } else {
        tokio::select! {
            result = serve_stdio(ops) => result,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupt received, shutting down");
                Ok(())
            }
        }
    };

    connection.close().await;
    served?;
    Ok(())
}
