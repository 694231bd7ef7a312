//! Decoder traits for per-situation flow fields and stability rasters.

use std::collections::HashMap;

use crate::error::SourceError;
use crate::snapshot::{StabilityRaster, WindFieldSnapshot};

/// File name of a per-situation file: the 1-based situation number padded
/// to five digits, e.g. `00012.gff`.
pub fn situation_file_name(situation: usize, extension: &str) -> String {
    format!("{:05}.{}", situation, extension)
}

/// Provides the decoded wind field of a situation.
///
/// `situation` is 1-based, matching the order of the situation table.
pub trait FlowFieldSource: Send + Sync {
    fn load(&self, situation: usize) -> Result<WindFieldSnapshot, SourceError>;
}

/// Provides the local stability raster of a situation.
pub trait StabilitySource: Send + Sync {
    fn load(&self, situation: usize) -> Result<StabilityRaster, SourceError>;
}

/// Flow fields held in memory, keyed by 1-based situation.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFlowFields {
    snapshots: HashMap<usize, WindFieldSnapshot>,
}

impl InMemoryFlowFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, situation: usize, snapshot: WindFieldSnapshot) {
        self.snapshots.insert(situation, snapshot);
    }

    pub fn with(mut self, situation: usize, snapshot: WindFieldSnapshot) -> Self {
        self.insert(situation, snapshot);
        self
    }
}

impl FlowFieldSource for InMemoryFlowFields {
    fn load(&self, situation: usize) -> Result<WindFieldSnapshot, SourceError> {
        self.snapshots
            .get(&situation)
            .cloned()
            .ok_or(SourceError::NotFound(situation))
    }
}

/// Stability rasters held in memory, keyed by 1-based situation.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStability {
    rasters: HashMap<usize, StabilityRaster>,
}

impl InMemoryStability {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, situation: usize, raster: StabilityRaster) -> Self {
        self.rasters.insert(situation, raster);
        self
    }
}

impl StabilitySource for InMemoryStability {
    fn load(&self, situation: usize) -> Result<StabilityRaster, SourceError> {
        self.rasters
            .get(&situation)
            .cloned()
            .ok_or(SourceError::NotFound(situation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_situation_file_name() {
        assert_eq!(situation_file_name(1, "gff"), "00001.gff");
        assert_eq!(situation_file_name(12345, "scl"), "12345.scl");
    }

    #[test]
    fn test_in_memory_missing() {
        let source = InMemoryFlowFields::new();
        assert!(matches!(source.load(3), Err(SourceError::NotFound(3))));
    }
}
