//! Error types for the policy core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for policy operations.
pub type PolicyResult<T> = Result<T, PolicyError>;

/// Errors surfaced by the policy core.
///
/// Only the template variants are fatal at startup. Everything that goes
/// wrong with the user-editable file is logged and degrades to "no
/// restrictions" inside [`crate::ConfigStore::load`].
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The embedded default configuration is absent from this build.
    #[error("embedded default config template is missing; the build is corrupt")]
    MissingTemplate,

    /// The embedded default configuration does not parse.
    #[error("embedded default config template is invalid: {0}")]
    InvalidTemplate(#[source] serde_json::Error),

    /// I/O error while touching a config resource.
    #[error("i/o error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PolicyError {
    /// Wrap an I/O error with the path it happened at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
