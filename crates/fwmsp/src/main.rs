//! fwmsp: MCP server for the Firewalla MSP API.
//!
//! Speaks MCP over stdio; all logging goes to stderr so the protocol
//! stream stays clean.

mod params;
mod server;

use clap::Parser;
use rmcp::{ServiceExt, transport::io::stdio};
use secrecy::SecretString;
use tracing::info;

use fwmsp_api::{MspClient, TransportConfig};
use fwmsp_config::MspConfig;
use server::MspServer;

/// MCP server exposing a Firewalla MSP deployment as tools.
///
/// Configuration comes from the environment: FIREWALLA_MSP_DOMAIN,
/// FIREWALLA_MSP_TOKEN, and optionally FIREWALLA_TIMEOUT_SECS.
#[derive(Debug, Parser)]
#[command(name = "fwmsp", version, about)]
struct Args {}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match MspConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    let token = SecretString::from(config.msp_token);
    let transport = TransportConfig::with_timeout_secs(config.timeout_secs);
    let client = MspClient::new(&config.msp_domain, &token, &transport)?;

    info!(domain = %config.msp_domain, "starting MCP server on stdio");
    let service = MspServer::new(client)
        .serve(stdio())
        .await
        .inspect_err(|e| tracing::error!("serving error: {e}"))?;
    service.waiting().await?;
    Ok(())
}
