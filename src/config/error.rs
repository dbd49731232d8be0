use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config source '{path}' has an unsupported extension (expected .yml, .yaml, or .json)")]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to parse config source '{path}': {source}")]
    Parse { path: PathBuf, source: DecodeError },

    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("bundled resource not found: {path}")]
    MissingResource { path: PathBuf },

    #[error("invalid key: {key}")]
    KeyNotFound { key: String },

    #[error("can't convert value \"{value}\" of key '{key}' to {target}")]
    Conversion {
        key: String,
        value: String,
        target: &'static str,
    },

    #[error("failed to deserialize key '{key}': {source}")]
    Deserialize {
        key: String,
        source: serde_json::Error,
    },
}

/// A decoder's native failure, preserved as the cause of [`ConfigError::Parse`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
