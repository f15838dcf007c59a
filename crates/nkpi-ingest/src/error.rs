use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid range reference {reference:?}: {message}")]
    InvalidRange { reference: String, message: String },

    #[error("range {range} starts outside the sheet ({rows} rows x {columns} columns)")]
    RangeOutOfBounds {
        range: String,
        rows: usize,
        columns: usize,
    },

    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl IngestError {
    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_range(reference: &str, message: impl Into<String>) -> Self {
        Self::InvalidRange {
            reference: reference.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
