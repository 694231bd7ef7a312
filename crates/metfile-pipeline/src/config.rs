//! Run configuration.
//!
//! A run is described by a YAML document:
//!
//! ```yaml
//! project_dir: /data/projects/graz
//! fine_cell_size: 2.0
//! coarse_grid:
//!   west: -5000
//!   south: -5000
//!   cell_size: 200
//!   windfield_dir: ${GRAMM_DIR:-/data/gramm}
//! local_stability: true
//! points:
//!   - file_name: Point_1.met
//!     x: 120.5
//!     y: -40
//!     z: 10
//! ```
//!
//! `${VAR}` and `${VAR:-default}` are expanded from the environment before
//! parsing.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use metfile_common::{EvaluationPoint, HorizontalGrid};

use crate::error::{PipelineError, Result};

/// Standard file locations inside a GRAL project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn computation_dir(&self) -> PathBuf {
        self.root.join("Computation")
    }

    pub fn situation_table(&self) -> PathBuf {
        self.computation_dir().join("meteopgt.all")
    }

    pub fn time_series(&self) -> PathBuf {
        self.computation_dir().join("mettimeseries.dat")
    }

    pub fn geometry(&self) -> PathBuf {
        self.computation_dir().join("GRAL_geometries.txt")
    }

    pub fn metfiles_dir(&self) -> PathBuf {
        self.root.join("Metfiles")
    }
}

/// The coarse (GRAMM) domain of a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoarseGridConfig {
    pub west: f64,
    pub south: f64,
    pub cell_size: f64,
    /// Directory holding the per-situation stability rasters
    #[serde(default)]
    pub windfield_dir: Option<PathBuf>,
}

/// Configuration of one meteo-file run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// GRAL project directory
    pub project_dir: PathBuf,

    /// Horizontal cell size of the fine grid in metres
    pub fine_cell_size: f64,

    /// Directory with the per-situation flow fields; defaults to the
    /// project's `Computation` directory
    #[serde(default)]
    pub flow_field_dir: Option<PathBuf>,

    #[serde(default)]
    pub coarse_grid: Option<CoarseGridConfig>,

    /// Use the coarse-grid stability raster instead of the domain class
    #[serde(default)]
    pub local_stability: bool,

    /// Directory for the meteo files; defaults to the project's `Metfiles`
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    pub points: Vec<EvaluationPoint>,
}

impl RunConfig {
    /// Load and validate a YAML configuration file.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_yaml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            points = config.points.len(),
            "Loaded run configuration"
        );
        Ok(config)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let expanded = expand_env_vars(content)?;
        let config: Self = serde_yaml::from_str(&expanded)
            .map_err(|e| PipelineError::Config(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure(
            self.fine_cell_size.is_finite() && self.fine_cell_size > 0.0,
            || format!("fine_cell_size must be positive, got {}", self.fine_cell_size),
        )?;

        if let Some(coarse) = &self.coarse_grid {
            ensure(coarse.cell_size.is_finite() && coarse.cell_size > 0.0, || {
                format!("coarse_grid.cell_size must be positive, got {}", coarse.cell_size)
            })?;
        }

        for (index, point) in self.points.iter().enumerate() {
            ensure(!point.output_name().is_empty(), || {
                format!("points[{}] has an empty file name", index)
            })?;
        }

        if self.local_stability && self.coarse_grid.is_none() {
            tracing::warn!(
                "local_stability is set but no coarse_grid is configured; it has no effect"
            );
        }

        Ok(())
    }

    pub fn layout(&self) -> ProjectLayout {
        ProjectLayout::new(&self.project_dir)
    }

    pub fn coarse_grid(&self) -> Option<HorizontalGrid> {
        self.coarse_grid
            .as_ref()
            .map(|c| HorizontalGrid::new(c.west, c.south, c.cell_size))
    }

    /// True when a stability raster should be consulted per situation.
    pub fn uses_local_stability(&self) -> bool {
        self.local_stability && self.coarse_grid.is_some()
    }

    pub fn flow_field_dir(&self) -> PathBuf {
        self.flow_field_dir
            .clone()
            .unwrap_or_else(|| self.layout().computation_dir())
    }

    /// Directory of the stability rasters; falls back to the flow-field
    /// directory.
    pub fn stability_dir(&self) -> PathBuf {
        self.coarse_grid
            .as_ref()
            .and_then(|c| c.windfield_dir.clone())
            .unwrap_or_else(|| self.flow_field_dir())
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| self.layout().metfiles_dir())
    }
}

fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(PipelineError::Config(message()))
    }
}

/// Expand `${VAR}` and `${VAR:-default}`.
fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or_else(|| {
            PipelineError::Config(format!("Unclosed variable substitution: ${{{}", after))
        })?;
        result.push_str(&resolve_var_expr(&after[..end])?);
        rest = &after[end + 1..];
    }
    result.push_str(rest);

    Ok(result)
}

fn resolve_var_expr(expr: &str) -> Result<String> {
    if let Some((name, default)) = expr.split_once(":-") {
        match std::env::var(name.trim()) {
            Ok(value) if !value.is_empty() => Ok(value),
            _ => Ok(default.to_string()),
        }
    } else {
        std::env::var(expr.trim())
            .map_err(|_| PipelineError::Config(format!("Environment variable {} not set", expr)))
    }
}
