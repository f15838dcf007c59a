use std::path::PathBuf;

use thiserror::Error;

/// Errors loading or validating a transform specification.
///
/// Data problems never surface here; they are reported as drops.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("failed to read transform spec {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse transform spec: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid transform spec: {message}")]
    InvalidSpec { message: String },
}

impl TransformError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidSpec {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
