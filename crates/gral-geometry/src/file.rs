//! Binary layout of `GRAL_geometries.txt`.
//!
//! All values are little-endian:
//!
//! | Field | Type |
//! |-------|------|
//! | NZ, NY, NX | i32 |
//! | west, south | i32 |
//! | dz_base, stretch | f32 |
//! | slice count (only if stretch < 0.1) | i32 |
//! | slice count x (height, factor) | f32, f32 |
//! | min terrain elevation | f32 |
//! | (NX+1)(NY+1) x (terrain, flag, building height) | f32, i32, f32 |
//!
//! Columns are stored with x as the outer loop and y as the inner loop.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::path::Path;

use metfile_common::HorizontalGrid;

use crate::error::{GeometryError, Result};
use crate::vertical::{StretchSlice, VerticalLayers, VerticalStretch, FLEXIBLE_STRETCH_THRESHOLD};

/// Bytes per terrain column record.
const COLUMN_RECORD_SIZE: usize = 12;

/// Upper bound on NZ accepted from a file header.
pub const MAX_VERTICAL_LAYERS: usize = 10_000;

/// Header of the fine-grid geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryGrid {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    /// Western edge of the fine grid
    pub west: i32,
    /// Southern edge of the fine grid
    pub south: i32,
    /// Thickness of the lowest layer
    pub dz_base: f32,
    pub stretch: VerticalStretch,
    /// Lowest terrain elevation in the domain
    pub min_terrain_elevation: f32,
}

impl GeometryGrid {
    /// Number of terrain columns stored in the file.
    pub fn column_count(&self) -> usize {
        (self.nx + 1) * (self.ny + 1)
    }

    /// Build the vertical layer table.
    pub fn layers(&self) -> VerticalLayers {
        VerticalLayers::build(self.nz, self.dz_base, &self.stretch, self.min_terrain_elevation)
    }

    /// Horizontal fine grid with the given cell size.
    pub fn horizontal_grid(&self, cell_size: f64) -> HorizontalGrid {
        HorizontalGrid::new(f64::from(self.west), f64::from(self.south), cell_size)
    }
}

/// Terrain information of one fine-grid column.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TerrainColumn {
    pub terrain_elevation: f32,
    /// Building grid-cell flag; stored as i32, only the low 16 bits are kept
    pub building_cell: i16,
    pub building_height: f32,
}

/// A decoded geometry file.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryFile {
    pub grid: GeometryGrid,
    columns: Vec<TerrainColumn>,
}

impl GeometryFile {
    /// Create a geometry from a header and its columns (x outer, y inner).
    pub fn new(grid: GeometryGrid, columns: Vec<TerrainColumn>) -> Result<Self> {
        check_layer_count(grid.nz)?;
        if columns.len() != grid.column_count() {
            return Err(GeometryError::invalid_header(format!(
                "expected {} terrain columns, got {}",
                grid.column_count(),
                columns.len()
            )));
        }
        Ok(Self { grid, columns })
    }

    /// Read and decode a geometry file from disk.
    pub fn read(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let geometry = Self::parse(&data)?;
        tracing::debug!(
            path = %path.display(),
            nx = geometry.grid.nx,
            ny = geometry.grid.ny,
            nz = geometry.grid.nz,
            flexible = geometry.grid.stretch.is_flexible(),
            "Read GRAL geometry"
        );
        Ok(geometry)
    }

    /// Decode a geometry file.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = FieldReader::new(data);

        let nz = reader.dimension("NZ")?;
        let ny = reader.dimension("NY")?;
        let nx = reader.dimension("NX")?;
        check_layer_count(nz)?;
        let west = reader.i32("west")?;
        let south = reader.i32("south")?;
        let dz_base = reader.f32("dz_base")?;
        let stretch_value = reader.f32("stretch")?;

        let stretch = if stretch_value < FLEXIBLE_STRETCH_THRESHOLD {
            let count = reader.i32("slice count")?;
            let count = usize::try_from(count).map_err(|_| {
                GeometryError::invalid_header(format!("negative slice count {}", count))
            })?;
            reader.ensure(count * 8, "stretch slices")?;
            let mut slices = Vec::with_capacity(count);
            for _ in 0..count {
                let height = reader.f32("slice height")?;
                let factor = reader.f32("slice factor")?;
                slices.push(StretchSlice::new(height, factor));
            }
            VerticalStretch::Flexible {
                flag: stretch_value,
                slices,
            }
        } else {
            VerticalStretch::Uniform {
                factor: stretch_value,
            }
        };

        let min_terrain_elevation = reader.f32("min terrain elevation")?;

        let grid = GeometryGrid {
            nx,
            ny,
            nz,
            west,
            south,
            dz_base,
            stretch,
            min_terrain_elevation,
        };

        let count = grid.column_count();
        let needed = count
            .checked_mul(COLUMN_RECORD_SIZE)
            .ok_or_else(|| GeometryError::invalid_header(format!("grid {}x{} too large", nx, ny)))?;
        reader.ensure(needed, "terrain columns")?;
        let mut columns = Vec::with_capacity(count);
        for _ in 0..count {
            let terrain_elevation = reader.f32("terrain elevation")?;
            let building_cell = reader.i32("building cell")? as i16;
            let building_height = reader.f32("building height")?;
            columns.push(TerrainColumn {
                terrain_elevation,
                building_cell,
                building_height,
            });
        }

        Ok(Self { grid, columns })
    }

    /// Encode into the on-disk layout.
    pub fn to_bytes(&self) -> Bytes {
        let grid = &self.grid;
        let mut buf = BytesMut::with_capacity(64 + self.columns.len() * COLUMN_RECORD_SIZE);

        buf.put_i32_le(grid.nz as i32);
        buf.put_i32_le(grid.ny as i32);
        buf.put_i32_le(grid.nx as i32);
        buf.put_i32_le(grid.west);
        buf.put_i32_le(grid.south);
        buf.put_f32_le(grid.dz_base);
        buf.put_f32_le(grid.stretch.raw_value());
        if let VerticalStretch::Flexible { slices, .. } = &grid.stretch {
            buf.put_i32_le(slices.len() as i32);
            for slice in slices {
                buf.put_f32_le(slice.height);
                buf.put_f32_le(slice.factor);
            }
        }
        buf.put_f32_le(grid.min_terrain_elevation);

        for column in &self.columns {
            buf.put_f32_le(column.terrain_elevation);
            buf.put_i32_le(i32::from(column.building_cell));
            buf.put_f32_le(column.building_height);
        }

        buf.freeze()
    }

    /// Terrain column at 1-based fine-grid indices, `1..=nx+1` by `1..=ny+1`.
    pub fn column(&self, ix: i32, iy: i32) -> Option<&TerrainColumn> {
        let i = usize::try_from(ix.checked_sub(1)?).ok()?;
        let j = usize::try_from(iy.checked_sub(1)?).ok()?;
        if i > self.grid.nx || j > self.grid.ny {
            return None;
        }
        self.columns.get(i * (self.grid.ny + 1) + j)
    }

    pub fn columns(&self) -> &[TerrainColumn] {
        &self.columns
    }
}

fn check_layer_count(nz: usize) -> Result<()> {
    if nz > MAX_VERTICAL_LAYERS {
        return Err(GeometryError::invalid_header(format!(
            "NZ {} exceeds the limit of {} layers",
            nz, MAX_VERTICAL_LAYERS
        )));
    }
    Ok(())
}

/// Sequential little-endian field reader with bounds checks.
struct FieldReader<'a> {
    buf: &'a [u8],
    len: usize,
}

impl<'a> FieldReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            buf: data,
            len: data.len(),
        }
    }

    fn offset(&self) -> usize {
        self.len - self.buf.remaining()
    }

    fn ensure(&self, bytes: usize, field: &'static str) -> Result<()> {
        if self.buf.remaining() < bytes {
            return Err(GeometryError::truncated(field, self.offset()));
        }
        Ok(())
    }

    fn i32(&mut self, field: &'static str) -> Result<i32> {
        self.ensure(4, field)?;
        Ok(self.buf.get_i32_le())
    }

    fn f32(&mut self, field: &'static str) -> Result<f32> {
        self.ensure(4, field)?;
        Ok(self.buf.get_f32_le())
    }

    fn dimension(&mut self, field: &'static str) -> Result<usize> {
        let value = self.i32(field)?;
        usize::try_from(value).map_err(|_| {
            GeometryError::invalid_header(format!(
                "{} must not be negative, got {}",
                field, value
            ))
        })
    }
}
