use std::path::PathBuf;
use thiserror::Error;
use xivlaunch_formats::FormatError;

use crate::error::ProtocolError;

/// Errors raised by a patch run
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("Failed to download patch {name}: {source}")]
    Download {
        name: String,
        #[source]
        source: ProtocolError,
    },

    #[error("Download task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Patch {name} is {actual} bytes, expected {expected}")]
    WrongSize {
        name: String,
        expected: u64,
        actual: u64,
    },

    #[error("Patch {name} has {blocks} blocks but {hashes} hashes")]
    HashCountMismatch {
        name: String,
        blocks: u64,
        hashes: usize,
    },

    #[error("Patch {name} block {block} has hash {actual}, expected {expected}")]
    HashMismatch {
        name: String,
        block: usize,
        expected: String,
        actual: String,
    },

    #[error("Failed to apply patch {name}: {source}")]
    ApplyFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to record installed version: {0}")]
    VersionMarker(#[from] FormatError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PatchError {
    /// The downloaded file did not match its manifest record and was discarded
    pub fn is_integrity(&self) -> bool {
        matches!(
            self,
            Self::WrongSize { .. } | Self::HashCountMismatch { .. } | Self::HashMismatch { .. }
        )
    }

    /// Applying failed part way, the installation may be left inconsistent
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ApplyFailed { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
