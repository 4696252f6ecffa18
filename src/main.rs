use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use miette::IntoDiagnostic;
use tokio::net::TcpListener;
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use bitbridge::bitbucket::BitbucketClient;
use bitbridge::cli::Cli;
use bitbridge::config::Config;
use bitbridge::server::{self, AppState};

#[tokio::main]
async fn main() -> miette::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    let config = Config::from_cli(&cli);
    info!(
        "bitbridge v{} -> {}",
        env!("CARGO_PKG_VERSION"),
        config.base_url
    );

    // The one pooled upstream client; owned here so it is released when the
    // server drains, not leaked for the process lifetime.
    let client = Arc::new(BitbucketClient::new(&config)?);
    let app = server::router(AppState { client });

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .into_diagnostic()?;
    let listener = TcpListener::bind(addr).await.into_diagnostic()?;
    info!("listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .into_diagnostic()?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to install ctrl-c handler: {err}");
    }
}
