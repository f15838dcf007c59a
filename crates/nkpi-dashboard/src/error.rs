use std::path::PathBuf;

use thiserror::Error;

use nkpi_ingest::IngestError;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("unknown page {label:?}")]
    UnknownPage { label: String },

    #[error("no table for {key}")]
    MissingTable { key: String },

    #[error("source cannot serve {key}")]
    UnsupportedRequest { key: String },

    #[error("unknown sheet {sheet:?}")]
    UnknownSheet { sheet: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

impl DashboardError {
    pub(crate) fn missing(key: impl Into<String>) -> Self {
        Self::MissingTable { key: key.into() }
    }

    pub(crate) fn unsupported(key: impl Into<String>) -> Self {
        Self::UnsupportedRequest { key: key.into() }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
