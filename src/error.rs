//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot read image {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Remote call error: {0}")]
    RemoteCall(String),

    #[error("Hotspot parse error on line {line}: {content:?}")]
    Parse { line: usize, content: String },

    #[error("Upload decode error: {0}")]
    Decode(String),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invariant violation: {0}")]
    Invariant(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::RemoteCall(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
