//! GRAL meteo-file generation pipeline.
//!
//! Turns precomputed GRAL/GRAMM wind fields into one meteorological time
//! series per evaluation point.
//!
//! # Architecture
//!
//! ```text
//! GRAL_geometries.txt ──► GeometryIndexer ──► PointIndices
//!                                                 │
//! NNNNN.gff (FlowFieldSource) ──► SituationSampler ◄── StabilityResolver ◄── NNNNN.scl
//!                                                 │
//!                                            SampleCache
//!                                                 │
//! mettimeseries.dat + meteopgt.all ──► TimeSeriesMatcher
//!                                                 │
//!                                          MeteoFileWriter ──► Metfiles/<point>
//! ```
//!
//! Decoding of the flow-field and stability files is left to implementations
//! of [`FlowFieldSource`] and [`StabilitySource`].

pub mod config;
pub mod direction;
pub mod error;
pub mod matcher;
pub mod pipeline;
pub mod progress;
pub mod sampler;
pub mod snapshot;
pub mod source;
pub mod stability;
pub mod writer;

// Re-exports
pub use config::{CoarseGridConfig, ProjectLayout, RunConfig};
pub use direction::{wind_direction, wind_speed};
pub use error::{PipelineError, Result, SourceError};
pub use matcher::{
    build_records, FictitiousYear, MatchedRecord, OutputRecord, TimeSeriesMatcher, MATCH_TOLERANCE,
};
pub use pipeline::{MetfilePipeline, RunInputs, RunSummary};
pub use progress::{CancelFlag, LogProgress, NoProgress, ProgressSink};
pub use sampler::{SampleCache, SampledResult, SituationSampler};
pub use snapshot::{StabilityRaster, WindFieldSnapshot};
pub use source::{
    situation_file_name, FlowFieldSource, InMemoryFlowFields, InMemoryStability, StabilitySource,
};
pub use stability::StabilityResolver;
pub use writer::MeteoFileWriter;
