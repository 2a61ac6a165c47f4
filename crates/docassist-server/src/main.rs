//! AI document assistant server
//!
//! Loads the TOML configuration, connects the improvement backends in their
//! configured order and serves the HTTP API.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use docassist_config::DocAssistConfig;
use docassist_improve::Orchestrator;
use docassist_server::{router, AppState};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "docassist-server")]
#[command(about = "Upload documents and review AI improvement suggestions")]
struct Args {
    /// Configuration file (defaults to $DOCASSIST_CONFIG, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind, overriding the configuration
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overriding the configuration
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = DocAssistConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate().context("validating configuration")?;

    let orchestrator = Orchestrator::from_config(&config.ai.backends, config.ai.suggestions_enabled)
        .await
        .context("initializing AI backends")?;
    for descriptor in orchestrator.descriptors() {
        info!(backend = %descriptor.label(), endpoint = %descriptor.endpoint, "Backend ready");
    }

    let addr = config.listen_addr();
    let app = router(AppState::new(config, orchestrator));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
