//! Evaluation points.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A user-defined location for which a meteo file is produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationPoint {
    /// Output file name; only the final path component is used.
    pub file_name: String,
    pub x: f64,
    pub y: f64,
    /// Height above local ground in metres
    pub z: f64,
}

impl EvaluationPoint {
    pub fn new(file_name: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            file_name: file_name.into(),
            x,
            y,
            z,
        }
    }

    /// The bare file name, stripped of any directory part.
    pub fn output_name(&self) -> &str {
        Path::new(&self.file_name)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.file_name)
    }
}
