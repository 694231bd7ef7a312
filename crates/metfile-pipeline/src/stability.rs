//! Stability class resolution with optional local override.

use metfile_common::CellIndex;

use crate::snapshot::StabilityRaster;

/// Resolves the stability class of a point for one situation.
///
/// Without a raster every point gets the snapshot's domain-wide class. With
/// a raster, a positive local class at the point's coarse cell wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct StabilityResolver<'a> {
    raster: Option<&'a StabilityRaster>,
}

impl<'a> StabilityResolver<'a> {
    /// A resolver that always returns the default class.
    pub fn domain_only() -> Self {
        Self { raster: None }
    }

    pub fn with_raster(raster: Option<&'a StabilityRaster>) -> Self {
        Self { raster }
    }

    /// Effective class for a point with the given coarse cell.
    pub fn resolve(&self, default_class: i32, coarse: Option<CellIndex>) -> i32 {
        let local = self
            .raster
            .zip(coarse)
            .and_then(|(raster, cell)| {
                let (x, y) = cell.zero_based()?;
                Some(raster.class_at(x, y))
            })
            .unwrap_or(0);

        if local > 0 {
            local
        } else {
            default_class
        }
    }
}
