//! Format detection and document decoding.

use std::path::Path;

use super::error::{ConfigError, DecodeError};
use super::source::Source;
use super::value::Value;

/// A supported document format, selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// Detects the format from a file extension, case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "yml" | "yaml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Resolves the format for a source's target file.
    ///
    /// A missing or unrecognized extension is fatal: there is no content
    /// sniffing fallback.
    pub fn for_source(source: &Source) -> Result<Self, ConfigError> {
        Self::for_path(source.file())
    }

    pub(crate) fn for_path(path: &Path) -> Result<Self, ConfigError> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
    }

    /// Decodes raw text into the generic value tree.
    pub fn decode(&self, text: &str) -> Result<Value, DecodeError> {
        match self {
            Self::Yaml => {
                let value: serde_yaml::Value = serde_yaml::from_str(text)?;
                Ok(value.into())
            }
            Self::Json => {
                let value: serde_json::Value = serde_json::from_str(text)?;
                Ok(value.into())
            }
        }
    }
}
