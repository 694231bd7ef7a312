//! Common types shared across the GRAL meteo-file crates.
//!
//! Covers the horizontal grid mapping used for both the coarse (GRAMM) and
//! fine (GRAL) domains, evaluation points, the situation table
//! (`meteopgt.all`) and the observed time series (`mettimeseries.dat`).

pub mod error;
pub mod fields;
pub mod grid;
pub mod observation;
pub mod point;
pub mod situation;

pub use error::{MetfileError, MetfileResult};
pub use fields::split_fields;
pub use grid::{CellIndex, DomainGrids, HorizontalGrid};
pub use observation::{ObservedRecord, ObservedSeries};
pub use point::EvaluationPoint;
pub use situation::{SituationRow, SituationTable};
