//! Error types for geometry decoding.

use thiserror::Error;

/// Errors that can occur while reading `GRAL_geometries.txt`.
#[derive(Error, Debug)]
pub enum GeometryError {
    /// The geometry file could not be opened or read.
    #[error("failed to read geometry file: {0}")]
    Io(#[from] std::io::Error),

    /// The file ended before a field could be decoded.
    #[error("geometry file truncated while reading {field} at byte {offset}")]
    Truncated { field: &'static str, offset: usize },

    /// A header value is out of range.
    #[error("invalid geometry header: {0}")]
    InvalidHeader(String),
}

impl GeometryError {
    pub fn truncated(field: &'static str, offset: usize) -> Self {
        Self::Truncated { field, offset }
    }

    pub fn invalid_header(msg: impl Into<String>) -> Self {
        Self::InvalidHeader(msg.into())
    }
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeometryError>;
