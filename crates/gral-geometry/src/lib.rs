//! GRAL geometry handling.
//!
//! Reads and writes the binary `GRAL_geometries.txt` file (grid dimensions,
//! vertical stretching and per-column terrain), builds the stretched vertical
//! layer table and maps evaluation points onto fine- and coarse-grid cells.
//!
//! # Example
//!
//! ```ignore
//! use gral_geometry::{GeometryFile, GeometryIndexer};
//!
//! let geometry = GeometryFile::read(&path)?;
//! let indexer = GeometryIndexer::new(&geometry, 2.0, None);
//! let indices = indexer.index_points(&points);
//! ```

pub mod error;
pub mod file;
pub mod indexer;
pub mod vertical;

pub use error::{GeometryError, Result};
pub use file::{GeometryFile, GeometryGrid, TerrainColumn, MAX_VERTICAL_LAYERS};
pub use indexer::{GeometryIndexer, PointIndices};
pub use vertical::{StretchSlice, VerticalLayers, VerticalStretch};
