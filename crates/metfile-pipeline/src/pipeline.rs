//! End-to-end meteo-file run.

use std::path::PathBuf;
use std::time::Instant;

use rayon::prelude::*;

use gral_geometry::{GeometryFile, GeometryIndexer};
use metfile_common::{ObservedSeries, SituationTable};

use crate::config::RunConfig;
use crate::error::{PipelineError, Result};
use crate::matcher::{build_records, TimeSeriesMatcher};
use crate::progress::{CancelFlag, ProgressSink};
use crate::sampler::SituationSampler;
use crate::source::{FlowFieldSource, StabilitySource};
use crate::writer::MeteoFileWriter;

/// Project inputs read from disk before sampling starts.
#[derive(Debug, Clone)]
pub struct RunInputs {
    pub situations: SituationTable,
    pub series: ObservedSeries,
    pub geometry: GeometryFile,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub points: usize,
    pub situations: usize,
    /// Lines written per file
    pub records: usize,
    /// Time series stopped at a malformed record
    pub truncated_series: bool,
    pub files: Vec<PathBuf>,
}

/// Generates the meteo files of a project.
#[derive(Debug, Clone)]
pub struct MetfilePipeline {
    config: RunConfig,
}

impl MetfilePipeline {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Read the situation table, the observed series and the geometry.
    ///
    /// A missing or empty situation table and a missing or truncated
    /// geometry end the run. A missing time series only yields files
    /// without records.
    pub fn load_inputs(&self) -> Result<RunInputs> {
        let layout = self.config.layout();

        let situations = SituationTable::read(&layout.situation_table())?;
        if situations.is_empty() {
            return Err(PipelineError::EmptySituationTable);
        }

        let series_path = layout.time_series();
        let series = match ObservedSeries::read(&series_path) {
            Ok(series) => series,
            Err(e) => {
                tracing::warn!(
                    path = %series_path.display(),
                    error = %e,
                    "No observed time series, meteo files will only contain headers"
                );
                ObservedSeries::default()
            }
        };

        let geometry = GeometryFile::read(&layout.geometry()).map_err(PipelineError::NoGeometry)?;

        Ok(RunInputs {
            situations,
            series,
            geometry,
        })
    }

    /// Load the inputs and run.
    pub fn run(
        &self,
        flow_fields: &dyn FlowFieldSource,
        stability: Option<&dyn StabilitySource>,
        cancel: &CancelFlag,
        progress: &dyn ProgressSink,
    ) -> Result<RunSummary> {
        let inputs = self.load_inputs()?;
        self.run_with_inputs(&inputs, flow_fields, stability, cancel, progress)
    }

    /// Run on already loaded inputs.
    ///
    /// No file is written unless sampling completes without cancellation.
    pub fn run_with_inputs(
        &self,
        inputs: &RunInputs,
        flow_fields: &dyn FlowFieldSource,
        stability: Option<&dyn StabilitySource>,
        cancel: &CancelFlag,
        progress: &dyn ProgressSink,
    ) -> Result<RunSummary> {
        if inputs.situations.is_empty() {
            return Err(PipelineError::EmptySituationTable);
        }

        let start = Instant::now();
        let points = &self.config.points;
        let situation_count = inputs.situations.len();

        tracing::info!(
            points = points.len(),
            situations = situation_count,
            records = inputs.series.len(),
            "Starting meteo file generation"
        );

        let indexer = GeometryIndexer::new(
            &inputs.geometry,
            self.config.fine_cell_size,
            self.config.coarse_grid(),
        );
        let indices = indexer.index_points(points);

        let stability = if self.config.uses_local_stability() {
            stability
        } else {
            None
        };
        let cache = SituationSampler::new(flow_fields, stability).sample(
            &indices,
            situation_count,
            cancel,
            progress,
        )?;

        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        let matched = TimeSeriesMatcher::new(&inputs.situations).match_series(&inputs.series);

        let output_dir = self.config.output_dir();
        std::fs::create_dir_all(&output_dir).map_err(|e| PipelineError::write(&output_dir, e))?;
        let writer = MeteoFileWriter::new(output_dir);

        let files = points
            .par_iter()
            .enumerate()
            .map(|(index, point)| writer.write(point, &build_records(&matched, cache.point(index))))
            .collect::<Result<Vec<PathBuf>>>()?;

        let summary = RunSummary {
            points: points.len(),
            situations: situation_count,
            records: matched.len(),
            truncated_series: inputs.series.is_truncated(),
            files,
        };

        tracing::info!(
            files = summary.files.len(),
            records = summary.records,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Meteo file generation complete"
        );

        Ok(summary)
    }
}
