//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `EVALUATOR_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::constants::{DEFAULT_PORT, EMBEDDINGS_MODEL_ID, LLM_MODEL_ID};
use crate::embedding::ModelSource;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `EVALUATOR_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `5000`.
    pub port: u16,

    /// IP address to bind to. Default: `0.0.0.0`.
    pub bind_addr: IpAddr,

    /// Verbose/debug server mode. Default: `false`.
    pub debug: bool,

    /// Local directory holding the sentence-embedding model
    /// (`config.json`, `model.safetensors`, `tokenizer.json`).
    pub embedding_model_path: Option<PathBuf>,

    /// Local directory holding the feedback generation model
    /// (`config.json`, `model.safetensors`, `tokenizer.json`).
    pub feedback_model_path: Option<PathBuf>,

    /// When set, never download models from the Hugging Face Hub.
    pub offline: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)),
            debug: false,
            embedding_model_path: None,
            feedback_model_path: None,
            offline: false,
        }
    }
}

impl Config {
    pub(crate) const ENV_PORT: &'static str = "EVALUATOR_PORT";
    const ENV_BIND_ADDR: &'static str = "EVALUATOR_BIND_ADDR";
    const ENV_DEBUG: &'static str = "EVALUATOR_DEBUG";
    const ENV_LEGACY_DEBUG: &'static str = "FLASK_DEBUG";
    const ENV_EMBEDDING_MODEL_PATH: &'static str = "EVALUATOR_EMBEDDING_MODEL_PATH";
    const ENV_FEEDBACK_MODEL_PATH: &'static str = "EVALUATOR_FEEDBACK_MODEL_PATH";
    const ENV_OFFLINE: &'static str = "EVALUATOR_OFFLINE";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let debug = Self::parse_bool_from_env(Self::ENV_DEBUG)
            .or_else(|| Self::parse_bool_from_env(Self::ENV_LEGACY_DEBUG))
            .unwrap_or(defaults.debug);
        let embedding_model_path =
            Self::parse_optional_path_from_env(Self::ENV_EMBEDDING_MODEL_PATH);
        let feedback_model_path = Self::parse_optional_path_from_env(Self::ENV_FEEDBACK_MODEL_PATH);
        let offline = Self::parse_bool_from_env(Self::ENV_OFFLINE).unwrap_or(defaults.offline);

        Ok(Self {
            port,
            bind_addr,
            debug,
            embedding_model_path,
            feedback_model_path,
            offline,
        })
    }

    /// Validates model paths (does not load anything).
    pub fn validate(&self) -> Result<(), ConfigError> {
        for path in [&self.embedding_model_path, &self.feedback_model_path]
            .into_iter()
            .flatten()
        {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        match self.bind_addr {
            IpAddr::V4(addr) => format!("{}:{}", addr, self.port),
            IpAddr::V6(addr) => format!("[{}]:{}", addr, self.port),
        }
    }

    /// Where to load the sentence-embedding model from (`None` when offline without a path).
    pub fn embedding_source(&self) -> Option<ModelSource> {
        ModelSource::select(
            self.embedding_model_path.clone(),
            EMBEDDINGS_MODEL_ID,
            self.offline,
        )
    }

    /// Where to load the feedback model from (`None` when offline without a path).
    pub fn feedback_source(&self) -> Option<ModelSource> {
        ModelSource::select(self.feedback_model_path.clone(), LLM_MODEL_ID, self.offline)
    }

    /// Default `tracing` filter directive for this mode (`RUST_LOG` takes precedence).
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_bool_from_env(var_name: &str) -> Option<bool> {
        env::var(var_name)
            .ok()
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
    }
}
