//! Test server harness.

use evaluator::embedding::{SentenceConfig, SentenceEmbedder};
use evaluator::evaluation::Evaluator;
use evaluator::feedback::{FeedbackConfig, FeedbackGenerator};
use evaluator::gateway::{HandlerState, create_router_with_state};
use evaluator::similarity::SimilarityScorer;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;

/// Which model backends the test server runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelMode {
    /// Stub embedder and stub generator.
    #[default]
    Stub,
    /// Stub embedder, no feedback model (score-band feedback).
    NoFeedbackModel,
    /// Stub embedder, generator that is ready but produces only whitespace.
    EmptyFeedback,
    /// Neither model loaded.
    Unavailable,
}

#[derive(Debug, Clone, Default)]
pub struct TestServerConfig {
    pub port: u16,
    pub models: ModelMode,
}

impl TestServerConfig {
    pub fn with_models(models: ModelMode) -> Self {
        Self {
            models,
            ..Default::default()
        }
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn find_available_port() -> std::io::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    Ok(addr.port())
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
}

fn build_evaluator(models: ModelMode) -> Evaluator {
    match models {
        ModelMode::Stub => Evaluator::stub(),
        ModelMode::NoFeedbackModel => Evaluator::new(
            SimilarityScorer::new(SentenceEmbedder::load(SentenceConfig::stub())),
            FeedbackGenerator::load(FeedbackConfig::unavailable()),
        ),
        ModelMode::EmptyFeedback => Evaluator::new(
            SimilarityScorer::new(SentenceEmbedder::load(SentenceConfig::stub())),
            FeedbackGenerator::load(FeedbackConfig::stub_with_output("   ")),
        ),
        ModelMode::Unavailable => Evaluator::unavailable("Model not loaded"),
    }
}

/// Spawns a server on a local port with stub (or missing) models.
///
/// No model files are needed; the stub embedder scores by word overlap and the stub
/// generator returns canned feedback.
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let port = if config.port == 0 {
        find_available_port().await?
    } else {
        config.port
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let state = HandlerState::new(Arc::new(build_evaluator(config.models)));
    let app = create_router_with_state(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr: local_addr,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}
