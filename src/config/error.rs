//! Errors raised while setting up a resolver.
//!
//! Lookups never fail; only loading a document and configuring the
//! environment prefix report errors.

use std::path::PathBuf;

use thiserror::Error;

use super::format::FileFormat;

/// Boxed parser error from whichever format crate rejected the document.
pub type ParseSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors during resolver setup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Load {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {format} config file {path}: {source}")]
    Parse {
        path: PathBuf,
        format: FileFormat,
        source: ParseSource,
    },

    #[error("unsupported config file extension '{extension}' for {path} (expected yaml, yml, toml or json)")]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("invalid environment prefix {prefix:?}: must not contain '=' or NUL")]
    InvalidPrefix { prefix: String },

    #[error("environment prefix already configured as {current:?}, refusing {requested:?}")]
    PrefixConflict { current: String, requested: String },
}

impl ConfigError {
    /// Returns `true` when the error is a missing file.
    ///
    /// Callers that did not explicitly ask for a file use this to carry on
    /// without a file layer.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ConfigError::Load { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

/// Result type for resolver setup operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
