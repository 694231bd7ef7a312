//! Error types for reading meteo-file inputs.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using MetfileError.
pub type MetfileResult<T> = Result<T, MetfileError>;

/// Errors raised while reading or parsing project input files.
#[derive(Debug, Error)]
pub enum MetfileError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed situation on line {line}: {reason}")]
    MalformedSituation { line: usize, reason: String },

    #[error("Malformed time-series record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
}

impl MetfileError {
    /// Create a Read error for the given path.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed_situation(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedSituation {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_record(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}
