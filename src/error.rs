//! Error kinds shared by the collect and render stages.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing credential, or one the API rejected.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Request failure or an error reported by the query endpoint.
    #[error("Network error: {0}")]
    Network(String),

    /// Tally file missing or not shaped like a tally.
    #[error("Failed to load tally from {}: {message}", .path.display())]
    DataLoad { path: PathBuf, message: String },

    /// Avatar download failure. Only ever seen inside the avatar module.
    #[error("Image fetch error: {0}")]
    ImageFetch(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn data_load(path: &Path, message: impl ToString) -> Self {
        Self::DataLoad {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn image_fetch(message: impl Into<String>) -> Self {
        Self::ImageFetch(message.into())
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
