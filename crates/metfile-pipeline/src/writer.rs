//! Per-point meteo file output.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use metfile_common::EvaluationPoint;

use crate::error::{PipelineError, Result};
use crate::matcher::OutputRecord;

/// Writes one meteo file per evaluation point into an output directory.
#[derive(Debug, Clone)]
pub struct MeteoFileWriter {
    output_dir: PathBuf,
}

impl MeteoFileWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the file written for `point`.
    pub fn path_for(&self, point: &EvaluationPoint) -> PathBuf {
        self.output_dir.join(point.output_name())
    }

    /// Write the file of one point, replacing any existing file.
    pub fn write(&self, point: &EvaluationPoint, records: &[OutputRecord]) -> Result<PathBuf> {
        let path = self.path_for(point);

        if path.exists() {
            if let Err(e) = fs::remove_file(&path) {
                tracing::debug!(
                    path = %path.display(),
                    error = %e,
                    "Could not remove existing meteo file"
                );
            }
        }

        let file = File::create(&path).map_err(|e| PipelineError::write(&path, e))?;
        let mut out = BufWriter::new(file);
        write_contents(&mut out, point, records).map_err(|e| PipelineError::write(&path, e))?;

        tracing::debug!(
            path = %path.display(),
            point = %point.file_name,
            records = records.len(),
            "Wrote meteo file"
        );

        Ok(path)
    }
}

fn write_contents<W: Write>(
    out: &mut W,
    point: &EvaluationPoint,
    records: &[OutputRecord],
) -> std::io::Result<()> {
    writeln!(out, "//{}", point.output_name())?;
    writeln!(out, "//X={}", point.x)?;
    writeln!(out, "//Y={}", point.y)?;
    writeln!(out, "//Z={}", point.z)?;
    for record in records {
        writeln!(out, "{}", record)?;
    }
    out.flush()
}
