use std::time::Duration;

use crate::config::Config;
use crate::constants::DEFAULT_PORT;

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(1);

/// Port a local health check should target (`EVALUATOR_PORT`, else the default).
pub fn health_check_port() -> u16 {
    std::env::var(Config::ENV_PORT)
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Returns `true` if `GET /health` on the local port answers with a success status.
///
/// Runs on the caller's runtime.
pub async fn check_health(port: u16) -> bool {
    let url = format!("http://127.0.0.1:{}/health", port);

    let Ok(client) = reqwest::Client::builder()
        .timeout(HEALTH_CHECK_TIMEOUT)
        .build()
    else {
        return false;
    };

    match client.get(&url).send().await {
        Ok(res) => res.status().is_success(),
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "Health check request failed");
            false
        }
    }
}
