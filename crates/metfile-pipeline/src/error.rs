//! Error types for the meteo-file pipeline.

use std::path::PathBuf;
use thiserror::Error;

use gral_geometry::GeometryError;
use metfile_common::MetfileError;

/// Errors that end a pipeline run. No meteo files are written when one of
/// these is returned before the writing stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Error reading meteorological input: {0}")]
    Input(#[from] MetfileError),

    #[error("Error reading meteorological input: no situations in table")]
    EmptySituationTable,

    #[error("No geometry available: {0}")]
    NoGeometry(#[source] GeometryError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Run cancelled")]
    Cancelled,

    #[error("Failed to write meteo file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Errors from flow-field and stability decoders. These never end a run;
/// the affected situation falls back to defaults.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("No data for situation {0}")]
    NotFound(usize),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Invalid field shape: {0}")]
    InvalidShape(String),
}

impl SourceError {
    pub fn decode(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_shape(msg: impl Into<String>) -> Self {
        Self::InvalidShape(msg.into())
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
