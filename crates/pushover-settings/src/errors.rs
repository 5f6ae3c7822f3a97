//! Errors raised while reading `settings.json` and applying overrides.

use std::path::PathBuf;

use thiserror::Error;

/// Why settings could not be produced.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The file could not be read, including a named file that is missing.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// Malformed JSON, or a key holding the wrong type.
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
    /// Well-formed but unusable, such as an unknown log level.
    #[error("invalid settings value: {0}")]
    InvalidValue(String),
}

impl SettingsError {
    /// Whether the failure is a file that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, SettingsError>;
