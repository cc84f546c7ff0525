//! Answer evaluator HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use evaluator::config::Config;
use evaluator::evaluation::Evaluator;
use evaluator::gateway::{HandlerState, check_health, create_router_with_state, health_check_port};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    if std::env::args().any(|arg| arg == "--health-check") {
        let healthy = check_health(health_check_port()).await;
        std::process::exit(if healthy { 0 } else { 1 });
    }

    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter())),
        )
        .init();

    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        debug = config.debug,
        offline = config.offline,
        "Answer evaluator starting"
    );

    tracing::info!("Loading AI models...");
    let model_config = config.clone();
    let evaluator = tokio::task::spawn_blocking(move || Evaluator::from_config(&model_config))
        .await?;

    let status = evaluator.status();
    if !status.embeddings_ready {
        tracing::warn!("Embedding model unavailable; evaluation requests will fail");
    }
    if !status.llm_ready {
        tracing::warn!("Feedback model unavailable; using score-band feedback");
    }

    let state = HandlerState::new(Arc::new(evaluator));
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Answer evaluator shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
