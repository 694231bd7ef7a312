//! Mapping of evaluation points onto fine- and coarse-grid cells.

use metfile_common::{CellIndex, DomainGrids, EvaluationPoint, HorizontalGrid};

use crate::file::GeometryFile;
use crate::vertical::VerticalLayers;

/// Grid indices of one evaluation point. All indices are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointIndices {
    /// Horizontal fine-grid cell
    pub fine: CellIndex,
    /// Vertical fine-grid layer; 0 when the point lies above the model top
    /// or outside the terrain table
    pub iz: usize,
    /// Coarse-grid cell, present when the run has a coarse domain
    pub coarse: Option<CellIndex>,
    /// Height above ground the layer was resolved for
    pub height: f64,
}

impl PointIndices {
    /// True when the vertical search found a layer.
    pub fn has_layer(&self) -> bool {
        self.iz > 0
    }

    /// True when the fine indices lie strictly inside a field of extent
    /// `(nii, njj, nkk)`.
    pub fn within(&self, nii: usize, njj: usize, nkk: usize) -> bool {
        let inside = |index: i64, extent: usize| index > 0 && index < extent as i64;
        inside(i64::from(self.fine.ix), nii)
            && inside(i64::from(self.fine.iy), njj)
            && inside(self.iz as i64, nkk)
    }
}

/// Computes grid indices for evaluation points from a decoded geometry.
#[derive(Debug, Clone)]
pub struct GeometryIndexer<'a> {
    geometry: &'a GeometryFile,
    layers: VerticalLayers,
    grids: DomainGrids,
}

impl<'a> GeometryIndexer<'a> {
    /// Create an indexer.
    ///
    /// The fine-grid origin comes from the geometry header; its cell size and
    /// the optional coarse grid come from the project configuration.
    pub fn new(
        geometry: &'a GeometryFile,
        fine_cell_size: f64,
        coarse: Option<HorizontalGrid>,
    ) -> Self {
        let fine = geometry.grid.horizontal_grid(fine_cell_size);
        Self {
            geometry,
            layers: geometry.grid.layers(),
            grids: DomainGrids::new(fine, coarse),
        }
    }

    pub fn grids(&self) -> &DomainGrids {
        &self.grids
    }

    pub fn layers(&self) -> &VerticalLayers {
        &self.layers
    }

    /// Indices for a single point.
    pub fn index_point(&self, point: &EvaluationPoint) -> PointIndices {
        let fine = self.grids.fine.cell_index(point.x, point.y);
        let coarse = self.grids.coarse.map(|grid| grid.cell_index(point.x, point.y));

        let iz = self
            .geometry
            .column(fine.ix, fine.iy)
            .and_then(|column| self.layers.layer_for(column.terrain_elevation, point.z))
            .unwrap_or(0);

        PointIndices {
            fine,
            iz,
            coarse,
            height: point.z,
        }
    }

    /// Indices for all points, in input order.
    pub fn index_points(&self, points: &[EvaluationPoint]) -> Vec<PointIndices> {
        let indices: Vec<PointIndices> = points.iter().map(|p| self.index_point(p)).collect();

        let unresolved = indices.iter().filter(|i| !i.has_layer()).count();
        if unresolved > 0 {
            tracing::warn!(
                unresolved,
                total = indices.len(),
                "Some evaluation points have no vertical layer and will not be sampled"
            );
        }

        indices
    }
}
