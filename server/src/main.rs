use std::future::IntoFuture;

use tokio::net::TcpListener;
use tracing::{error, info};

use llm_sim_server::{app, config::ServerConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    async_main().await
}

async fn async_main() -> anyhow::Result<()> {
    info!("Starting LLM simulator server...");

    // Load configuration from environment
    let config = ServerConfig::from_env();
    info!(
        "Server configuration loaded: addr={}, rate_limit={}/min, request_timeout={}s",
        config.bind_addr(),
        config.rate_limit_per_minute,
        config.request_timeout_secs
    );

    let addr = config.bind_addr();
    let app = app(AppState::new(config));

    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        anyhow::anyhow!("Failed to bind {addr}: {e}. Try a different HOST or PORT.")
    })?;

    info!("Server listening on http://{}", listener.local_addr()?);

    // Open streams are dropped with the runtime rather than drained
    tokio::select! {
        result = axum::serve(listener, app).into_future() => result?,
        _ = shutdown_signal() => info!("Shutdown signal received, stopping server"),
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
