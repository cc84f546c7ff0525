use std::io;
use std::path::{Path, PathBuf};

use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

/// File names every model directory must provide.
pub const CONFIG_FILE: &str = "config.json";
pub const WEIGHTS_FILE: &str = "model.safetensors";
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Where a pretrained model is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// A local directory containing `config.json`, `model.safetensors` and `tokenizer.json`.
    Local(PathBuf),
    /// A Hugging Face Hub repository, fetched into the local hub cache on first use.
    Hub { repo_id: String },
}

impl ModelSource {
    /// Picks a local directory when one is configured, the hub repository otherwise.
    ///
    /// Returns `None` when no directory is configured and downloads are disabled.
    pub fn select(local_dir: Option<PathBuf>, repo_id: &str, offline: bool) -> Option<Self> {
        match local_dir {
            Some(dir) => Some(Self::Local(dir)),
            None if offline => None,
            None => Some(Self::Hub {
                repo_id: repo_id.to_string(),
            }),
        }
    }

    /// Resolves the three model files, downloading them if needed.
    pub fn resolve(&self) -> io::Result<ModelFiles> {
        match self {
            ModelSource::Local(dir) => ModelFiles::in_dir(dir),
            ModelSource::Hub { repo_id } => {
                info!(repo_id = %repo_id, "Fetching model files from Hugging Face Hub");
                let api = hf_hub::api::sync::Api::new().map_err(|e| io::Error::other(e.to_string()))?;
                let repo = api.model(repo_id.clone());
                let fetch = |name: &str| repo.get(name).map_err(|e| io::Error::other(e.to_string()));

                Ok(ModelFiles {
                    config: fetch(CONFIG_FILE)?,
                    weights: fetch(WEIGHTS_FILE)?,
                    tokenizer: fetch(TOKENIZER_FILE)?,
                })
            }
        }
    }
}

impl std::fmt::Display for ModelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelSource::Local(dir) => write!(f, "{}", dir.display()),
            ModelSource::Hub { repo_id } => write!(f, "hf://{}", repo_id),
        }
    }
}

/// Paths of a resolved model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFiles {
    pub config: PathBuf,
    pub weights: PathBuf,
    pub tokenizer: PathBuf,
}

impl ModelFiles {
    /// Locates the model files inside `dir`, failing on the first missing one.
    pub fn in_dir(dir: &Path) -> io::Result<Self> {
        if !dir.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("model directory not found: {}", dir.display()),
            ));
        }

        let require = |name: &str| {
            let path = dir.join(name);
            if path.is_file() {
                Ok(path)
            } else {
                Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("missing {} in {}", name, dir.display()),
                ))
            }
        };

        Ok(Self {
            config: require(CONFIG_FILE)?,
            weights: require(WEIGHTS_FILE)?,
            tokenizer: require(TOKENIZER_FILE)?,
        })
    }
}

/// Loads a tokenizer with truncation enabled for a maximum sequence length.
///
/// Padding is disabled: every call encodes a single sequence.
pub fn load_tokenizer_with_truncation(path: &Path, max_len: usize) -> io::Result<Tokenizer> {
    let mut tokenizer = Tokenizer::from_file(path).map_err(io::Error::other)?;

    let truncation = TruncationParams {
        max_length: max_len,
        ..Default::default()
    };

    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| io::Error::other(format!("Failed to configure truncation: {}", e)))?;
    tokenizer.with_padding(None);

    debug!(path = %path.display(), max_len, "Tokenizer loaded");
    Ok(tokenizer)
}
