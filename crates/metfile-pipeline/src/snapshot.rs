//! Decoded per-situation fields.

use crate::error::SourceError;

/// The wind field of one situation on the fine grid.
///
/// Components are stored for indices `0..=nii`, `0..=njj`, `0..=nkk` with
/// `i` as the outermost and `k` as the innermost dimension. Valid cells for
/// sampling are `1..nii`, `1..njj`, `1..nkk`.
#[derive(Debug, Clone, PartialEq)]
pub struct WindFieldSnapshot {
    nii: usize,
    njj: usize,
    nkk: usize,
    u: Vec<f32>,
    v: Vec<f32>,
    w: Vec<f32>,
    /// Domain-wide stability class of the situation
    stability_class: i32,
}

impl WindFieldSnapshot {
    /// Create a snapshot, checking that every component has
    /// `(nii + 1) * (njj + 1) * (nkk + 1)` values.
    pub fn new(
        (nii, njj, nkk): (usize, usize, usize),
        u: Vec<f32>,
        v: Vec<f32>,
        w: Vec<f32>,
        stability_class: i32,
    ) -> Result<Self, SourceError> {
        let expected = nii
            .checked_add(1)
            .zip(njj.checked_add(1))
            .zip(nkk.checked_add(1))
            .and_then(|((i, j), k)| i.checked_mul(j)?.checked_mul(k))
            .ok_or_else(|| {
                SourceError::invalid_shape(format!(
                    "extent {}x{}x{} is too large",
                    nii, njj, nkk
                ))
            })?;
        for (name, component) in [("u", &u), ("v", &v), ("w", &w)] {
            if component.len() != expected {
                return Err(SourceError::invalid_shape(format!(
                    "component {} has {} values, expected {} for extent {}x{}x{}",
                    name,
                    component.len(),
                    expected,
                    nii,
                    njj,
                    nkk
                )));
            }
        }
        Ok(Self {
            nii,
            njj,
            nkk,
            u,
            v,
            w,
            stability_class,
        })
    }

    /// Grid extents `(nii, njj, nkk)`.
    pub fn extents(&self) -> (usize, usize, usize) {
        (self.nii, self.njj, self.nkk)
    }

    pub fn stability_class(&self) -> i32 {
        self.stability_class
    }

    fn offset(&self, i: usize, j: usize, k: usize) -> Option<usize> {
        if i > self.nii || j > self.njj || k > self.nkk {
            return None;
        }
        Some((i * (self.njj + 1) + j) * (self.nkk + 1) + k)
    }

    /// Velocity `(u, v, w)` at a cell.
    pub fn velocity(&self, i: usize, j: usize, k: usize) -> Option<(f32, f32, f32)> {
        let offset = self.offset(i, j, k)?;
        Some((self.u[offset], self.v[offset], self.w[offset]))
    }
}

/// Local stability classes of one situation on the coarse grid.
///
/// Addressed with zero-based `(x, y)`, x outer. Non-positive values mark
/// cells without a valid class.
#[derive(Debug, Clone, PartialEq)]
pub struct StabilityRaster {
    nx: usize,
    ny: usize,
    classes: Vec<i32>,
}

impl StabilityRaster {
    pub fn new(nx: usize, ny: usize, classes: Vec<i32>) -> Result<Self, SourceError> {
        let expected = nx.checked_mul(ny).ok_or_else(|| {
            SourceError::invalid_shape(format!("stability raster {}x{} is too large", nx, ny))
        })?;
        if classes.len() != expected {
            return Err(SourceError::invalid_shape(format!(
                "stability raster has {} values, expected {}x{}",
                classes.len(),
                nx,
                ny
            )));
        }
        Ok(Self { nx, ny, classes })
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Class at `(x, y)`, or 0 outside the raster.
    pub fn class_at(&self, x: usize, y: usize) -> i32 {
        if x >= self.nx || y >= self.ny {
            return 0;
        }
        self.classes[x * self.ny + y]
    }
}
