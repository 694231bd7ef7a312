//! Stretched vertical layers of the fine grid.
//!
//! Layer thickness starts at `dz_base` and grows either by a single factor
//! per layer or by a piecewise factor that changes at height breakpoints.

/// Stretch values below this threshold select flexible stretching.
pub const FLEXIBLE_STRETCH_THRESHOLD: f32 = 0.1;

/// Factors at or below this value do not stretch.
const MIN_EFFECTIVE_STRETCH: f32 = 0.99;

/// One breakpoint of flexible vertical stretching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StretchSlice {
    /// Height above the lowest terrain from which the factor applies
    pub height: f32,
    pub factor: f32,
}

impl StretchSlice {
    pub fn new(height: f32, factor: f32) -> Self {
        Self { height, factor }
    }
}

/// How layer thickness grows with height.
#[derive(Debug, Clone, PartialEq)]
pub enum VerticalStretch {
    /// A single factor applied to every layer. Only factors above 0.99
    /// actually stretch; smaller ones keep the thickness constant.
    Uniform { factor: f32 },
    /// Piecewise factors. `flag` is the raw stretch value stored in the
    /// file (always below 0.1).
    Flexible { flag: f32, slices: Vec<StretchSlice> },
}

impl VerticalStretch {
    /// The stretch value as stored in the geometry header.
    pub fn raw_value(&self) -> f32 {
        match self {
            Self::Uniform { factor } => *factor,
            Self::Flexible { flag, .. } => *flag,
        }
    }

    pub fn is_flexible(&self) -> bool {
        matches!(self, Self::Flexible { .. })
    }
}

/// Cumulative layer heights, `heights[0] == 0` and `heights[k]` the top of
/// layer `k`, relative to the lowest terrain elevation.
#[derive(Debug, Clone, PartialEq)]
pub struct VerticalLayers {
    heights: Vec<f32>,
    min_terrain_elevation: f32,
}

impl VerticalLayers {
    /// Build the height table for `nz` layers.
    ///
    /// With flexible stretching the switch to the next slice compares the
    /// top of the previous layer (`heights[k - 1]`) with the breakpoint, so
    /// a new factor takes effect one layer late. Slice 0 never supplies a
    /// factor; the initial factor is 1.
    pub fn build(
        nz: usize,
        dz_base: f32,
        stretch: &VerticalStretch,
        min_terrain_elevation: f32,
    ) -> Self {
        let mut heights = vec![0.0_f32; nz + 1];
        let mut dz = dz_base;
        let mut slice_index = 0usize;
        let mut flexible_factor = 1.0_f32;

        for k in 1..=nz {
            heights[k] = heights[k - 1] + dz;

            match stretch {
                VerticalStretch::Uniform { factor } if *factor > MIN_EFFECTIVE_STRETCH => {
                    dz *= *factor;
                }
                VerticalStretch::Uniform { .. } => {}
                VerticalStretch::Flexible { slices, .. } => {
                    if let Some(next) = slices.get(slice_index + 1) {
                        if next.factor > MIN_EFFECTIVE_STRETCH && heights[k - 1] > next.height {
                            flexible_factor = next.factor;
                            slice_index += 1;
                        }
                    }
                    dz *= flexible_factor;
                }
            }
        }

        Self {
            heights,
            min_terrain_elevation,
        }
    }

    /// Number of layers.
    pub fn nz(&self) -> usize {
        self.heights.len().saturating_sub(1)
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// First layer whose top reaches `terrain + height_above_ground`.
    ///
    /// Returns `None` when the point lies above the model top.
    pub fn layer_for(&self, terrain_elevation: f32, height_above_ground: f64) -> Option<usize> {
        let target = f64::from(terrain_elevation) + height_above_ground;
        (1..self.heights.len())
            .find(|&k| f64::from(self.heights[k] + self.min_terrain_elevation) >= target)
    }
}
