//! Horizontal grid mappings for the coarse (GRAMM) and fine (GRAL) domains.

use serde::{Deserialize, Serialize};

/// A regular horizontal grid anchored at its south-west corner.
///
/// Cell indices are 1-based: a coordinate exactly on the western edge maps
/// to column 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalGrid {
    /// Western edge of the domain
    pub west: f64,
    /// Southern edge of the domain
    pub south: f64,
    /// Horizontal cell size in metres
    pub cell_size: f64,
}

impl HorizontalGrid {
    /// Create a new horizontal grid.
    pub fn new(west: f64, south: f64, cell_size: f64) -> Self {
        Self {
            west,
            south,
            cell_size,
        }
    }

    /// Map a coordinate onto its 1-based cell index.
    ///
    /// No range check is applied; points west or south of the origin yield
    /// indices below 1. Coordinates beyond the `i32` range saturate.
    pub fn cell_index(&self, x: f64, y: f64) -> CellIndex {
        CellIndex {
            ix: axis_index(x - self.west, self.cell_size),
            iy: axis_index(y - self.south, self.cell_size),
        }
    }
}

fn axis_index(offset: f64, cell_size: f64) -> i32 {
    ((offset / cell_size).floor() as i32).saturating_add(1)
}

/// A 1-based horizontal cell index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellIndex {
    pub ix: i32,
    pub iy: i32,
}

impl CellIndex {
    pub fn new(ix: i32, iy: i32) -> Self {
        Self { ix, iy }
    }

    /// The zero-based index pair used to address rasters, if non-negative.
    pub fn zero_based(&self) -> Option<(usize, usize)> {
        let x = usize::try_from(self.ix.checked_sub(1)?).ok()?;
        let y = usize::try_from(self.iy.checked_sub(1)?).ok()?;
        Some((x, y))
    }
}

/// The pair of nested grids used by one run.
///
/// The fine grid is always present. The coarse grid only exists for projects
/// driven by a GRAMM wind field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainGrids {
    pub fine: HorizontalGrid,
    pub coarse: Option<HorizontalGrid>,
}

impl DomainGrids {
    pub fn new(fine: HorizontalGrid, coarse: Option<HorizontalGrid>) -> Self {
        Self { fine, coarse }
    }

    pub fn has_coarse(&self) -> bool {
        self.coarse.is_some()
    }
}
