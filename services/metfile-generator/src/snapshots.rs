//! Decoded per-situation fields stored as JSON documents.
//!
//! Flow fields are read from `NNNNN.wind.json` and local stability rasters
//! from `NNNNN.scl.json`, where `NNNNN` is the 1-based situation number.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use metfile_pipeline::{
    situation_file_name, FlowFieldSource, SourceError, StabilityRaster, StabilitySource,
    WindFieldSnapshot,
};

pub const WIND_EXTENSION: &str = "wind.json";
pub const STABILITY_EXTENSION: &str = "scl.json";

/// On-disk form of a wind field. Components are flattened with `i` outer
/// and `k` inner over `0..=nii`, `0..=njj`, `0..=nkk`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindFieldDocument {
    pub nii: usize,
    pub njj: usize,
    pub nkk: usize,
    pub stability_class: i32,
    pub u: Vec<f32>,
    pub v: Vec<f32>,
    pub w: Vec<f32>,
}

/// On-disk form of a stability raster, flattened with `x` outer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StabilityDocument {
    pub nx: usize,
    pub ny: usize,
    pub classes: Vec<i32>,
}

fn read_document<T: for<'de> Deserialize<'de>>(
    path: &Path,
    situation: usize,
) -> Result<T, SourceError> {
    let data = fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            SourceError::NotFound(situation)
        } else {
            SourceError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_slice(&data).map_err(|e| SourceError::decode(path, e.to_string()))
}

/// Flow fields in a directory of `NNNNN.wind.json` files.
#[derive(Debug, Clone)]
pub struct JsonFlowFields {
    dir: PathBuf,
}

impl JsonFlowFields {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, situation: usize) -> PathBuf {
        self.dir.join(situation_file_name(situation, WIND_EXTENSION))
    }
}

impl FlowFieldSource for JsonFlowFields {
    fn load(&self, situation: usize) -> Result<WindFieldSnapshot, SourceError> {
        let doc: WindFieldDocument = read_document(&self.path_for(situation), situation)?;
        WindFieldSnapshot::new(
            (doc.nii, doc.njj, doc.nkk),
            doc.u,
            doc.v,
            doc.w,
            doc.stability_class,
        )
    }
}

/// Stability rasters in a directory of `NNNNN.scl.json` files.
#[derive(Debug, Clone)]
pub struct JsonStability {
    dir: PathBuf,
}

impl JsonStability {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, situation: usize) -> PathBuf {
        self.dir.join(situation_file_name(situation, STABILITY_EXTENSION))
    }
}

impl StabilitySource for JsonStability {
    fn load(&self, situation: usize) -> Result<StabilityRaster, SourceError> {
        let doc: StabilityDocument = read_document(&self.path_for(situation), situation)?;
        StabilityRaster::new(doc.nx, doc.ny, doc.classes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_json<T: Serialize>(path: PathBuf, value: &T) {
        fs::write(path, serde_json::to_vec(value).unwrap()).unwrap();
    }

    #[test]
    fn test_load_wind_field() {
        let dir = TempDir::new().unwrap();
        let source = JsonFlowFields::new(dir.path());
        write_json(
            source.path_for(3),
            &WindFieldDocument {
                nii: 1,
                njj: 1,
                nkk: 1,
                stability_class: 5,
                u: vec![1.0; 8],
                v: vec![2.0; 8],
                w: vec![0.0; 8],
            },
        );

        let snapshot = source.load(3).unwrap();
        assert_eq!(snapshot.extents(), (1, 1, 1));
        assert_eq!(snapshot.stability_class(), 5);
        assert_eq!(snapshot.velocity(1, 1, 1), Some((1.0, 2.0, 0.0)));
        assert!(source.path_for(3).ends_with("00003.wind.json"));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let source = JsonFlowFields::new(dir.path());
        assert!(matches!(source.load(1), Err(SourceError::NotFound(1))));
    }

    #[test]
    fn test_invalid_json_is_decode_error() {
        let dir = TempDir::new().unwrap();
        let source = JsonStability::new(dir.path());
        fs::write(source.path_for(2), b"{ not json").unwrap();
        assert!(matches!(source.load(2), Err(SourceError::Decode { .. })));
    }

    #[test]
    fn test_shape_mismatch_is_rejected() {
        let dir = TempDir::new().unwrap();
        let source = JsonStability::new(dir.path());
        write_json(
            source.path_for(1),
            &StabilityDocument {
                nx: 2,
                ny: 2,
                classes: vec![1, 2, 3],
            },
        );
        assert!(matches!(source.load(1), Err(SourceError::InvalidShape(_))));
    }

    #[test]
    fn test_load_stability() {
        let dir = TempDir::new().unwrap();
        let source = JsonStability::new(dir.path());
        write_json(
            source.path_for(1),
            &StabilityDocument {
                nx: 2,
                ny: 1,
                classes: vec![3, 6],
            },
        );
        let raster = source.load(1).unwrap();
        assert_eq!(raster.class_at(1, 0), 6);
    }
}
