use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConverterError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Error probing {path:?}: {msg}")]
    Probe { path: PathBuf, msg: String },

    #[error("Unable to parse progress value '{value}' for '{key}'")]
    Progress { key: String, value: String },
}

impl ConverterError {
    pub fn probe(path: &Path, msg: &str) -> Self {
        ConverterError::Probe {
            path: path.to_path_buf(),
            msg: String::from(msg),
        }
    }
}
