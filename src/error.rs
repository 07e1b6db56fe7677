use std::path::PathBuf;
use thiserror::Error;

use crate::state::data::FacilityId;

/// Startup failures. Nothing after startup produces an `AppError`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read dataset {path}: {source}")]
    DatasetRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid facility dataset: {0}")]
    DatasetParse(#[from] serde_json::Error),

    #[error("duplicate facility id {0} in dataset")]
    DuplicateId(FacilityId),
}

pub type Result<T> = std::result::Result<T, AppError>;
