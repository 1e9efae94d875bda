//! Application errors

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Required setting absent from the environment
    #[error("missing configuration: {0} is not set")]
    MissingSetting(&'static str),

    /// Setting present but unparseable
    #[error("invalid configuration: {name}={value}")]
    InvalidSetting { name: &'static str, value: String },

    #[error("failed to read order file {path}: {source}")]
    ReadOrder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid order file {path}: {source}")]
    ParseOrder {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type AppResult<T> = Result<T, AppError>;
