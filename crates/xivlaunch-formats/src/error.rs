//! Error types for format operations

use std::path::PathBuf;
use thiserror::Error;

use crate::patch_list::PatchListError;

/// Errors raised while reading or writing launcher formats
#[derive(Debug, Error)]
pub enum FormatError {
    /// Patch list could not be parsed
    #[error("Patch list error: {0}")]
    PatchList(#[from] PatchListError),

    /// File could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl FormatError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for format operations
pub type Result<T> = std::result::Result<T, FormatError>;
