//! HTTP server exposing the sample `faqs` resource over REST and the
//! query/mutation endpoint.

mod app;
mod config;
mod faq;
mod logging;
mod migration;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "crudkit-server", version, about = "Gated CRUD resources over HTTP")]
struct Cli {
    /// YAML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = AppConfig::load(cli.config.as_deref()).context("load configuration")?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&cfg)?);
        return Ok(());
    }

    logging::init(&cfg.logging)?;
    tracing::info!(bind_addr = %cfg.server.bind_addr, "starting crudkit-server");

    let db = app::prepare_db(&cfg).await?;
    let router = app::router(&cfg, db)?;

    let listener = tokio::net::TcpListener::bind(&cfg.server.bind_addr)
        .await
        .with_context(|| format!("bind {}", cfg.server.bind_addr))?;
    tracing::info!(addr = %cfg.server.bind_addr, "listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutdown signal received");
}
