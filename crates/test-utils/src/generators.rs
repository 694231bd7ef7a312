//! Generators for synthetic geometry and wind-field data.

use bytes::BufMut;

/// Description of a fine-grid geometry for [`encode_geometry`].
#[derive(Debug, Clone)]
pub struct GeometryParams {
    pub nx: i32,
    pub ny: i32,
    pub nz: i32,
    pub west: i32,
    pub south: i32,
    pub dz_base: f32,
    /// Raw stretch value; below 0.1 the `slices` are written
    pub stretch: f32,
    pub slices: Vec<(f32, f32)>,
    pub min_terrain_elevation: f32,
}

impl GeometryParams {
    /// A small grid without stretching: 10 x 10 columns, 20 layers of 2 m.
    pub fn flat(west: i32, south: i32) -> Self {
        Self {
            nx: 10,
            ny: 10,
            nz: 20,
            west,
            south,
            dz_base: 2.0,
            stretch: 1.0,
            slices: Vec::new(),
            min_terrain_elevation: 0.0,
        }
    }
}

/// Encode a `GRAL_geometries.txt` file.
///
/// `terrain(i, j)` gives the terrain elevation of the 1-based column
/// `(i, j)`; building flags and heights are written as zero.
pub fn encode_geometry(params: &GeometryParams, terrain: impl Fn(i32, i32) -> f32) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.put_i32_le(params.nz);
    buf.put_i32_le(params.ny);
    buf.put_i32_le(params.nx);
    buf.put_i32_le(params.west);
    buf.put_i32_le(params.south);
    buf.put_f32_le(params.dz_base);
    buf.put_f32_le(params.stretch);
    if params.stretch < 0.1 {
        buf.put_i32_le(params.slices.len() as i32);
        for (height, factor) in &params.slices {
            buf.put_f32_le(*height);
            buf.put_f32_le(*factor);
        }
    }
    buf.put_f32_le(params.min_terrain_elevation);

    for i in 1..=params.nx + 1 {
        for j in 1..=params.ny + 1 {
            buf.put_f32_le(terrain(i, j));
            buf.put_i32_le(0);
            buf.put_f32_le(0.0);
        }
    }
    buf
}

/// A velocity component array of extent `(nii+1, njj+1, nkk+1)` filled with
/// `value`.
pub fn uniform_component(nii: usize, njj: usize, nkk: usize, value: f32) -> Vec<f32> {
    vec![value; (nii + 1) * (njj + 1) * (nkk + 1)]
}

/// A velocity component array where the value at `(i, j, k)` is
/// `i * 100 + j * 10 + k`, to verify addressing.
pub fn indexed_component(nii: usize, njj: usize, nkk: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity((nii + 1) * (njj + 1) * (nkk + 1));
    for i in 0..=nii {
        for j in 0..=njj {
            for k in 0..=nkk {
                data.push((i * 100 + j * 10 + k) as f32);
            }
        }
    }
    data
}
