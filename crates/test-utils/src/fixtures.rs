//! Temporary GRAL project directories.
//!
//! A project keeps its inputs under `Computation/` and receives generated
//! meteo files under `Metfiles/`.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Header lines written at the top of every `meteopgt.all` fixture.
pub const METEOPGT_HEADER: &str = "10,0,10,    !Are dispersion situations classified =0 or not =1\n\
Wind direction sector,Wind speed class,stability class, frequency\n";

/// A project directory that is removed when dropped.
pub struct ProjectFixture {
    dir: TempDir,
}

impl ProjectFixture {
    /// Create an empty project with `Computation/` and `Metfiles/`.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::create_dir_all(dir.path().join("Computation")).expect("Failed to create Computation");
        fs::create_dir_all(dir.path().join("Metfiles")).expect("Failed to create Metfiles");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn computation_dir(&self) -> PathBuf {
        self.root().join("Computation")
    }

    pub fn metfiles_dir(&self) -> PathBuf {
        self.root().join("Metfiles")
    }

    /// Write `meteopgt.all` from (direction, speed, stability) rows.
    pub fn write_situations(&self, rows: &[(f64, f64, i32)]) -> PathBuf {
        let mut content = String::from(METEOPGT_HEADER);
        for (direction, speed, stability) in rows {
            content.push_str(&format!("{},{},{},1.0\n", direction, speed, stability));
        }
        let path = self.computation_dir().join("meteopgt.all");
        fs::write(&path, content).expect("Failed to write meteopgt.all");
        path
    }

    /// Write `mettimeseries.dat` from raw lines.
    pub fn write_time_series(&self, lines: &[&str]) -> PathBuf {
        let path = self.computation_dir().join("mettimeseries.dat");
        fs::write(&path, lines.join("\n")).expect("Failed to write mettimeseries.dat");
        path
    }

    /// Write `GRAL_geometries.txt` from encoded bytes.
    pub fn write_geometry(&self, bytes: &[u8]) -> PathBuf {
        let path = self.computation_dir().join("GRAL_geometries.txt");
        fs::write(&path, bytes).expect("Failed to write GRAL_geometries.txt");
        path
    }

    /// Read a generated meteo file into lines.
    pub fn read_metfile(&self, name: &str) -> Vec<String> {
        fs::read_to_string(self.metfiles_dir().join(name))
            .expect("Failed to read meteo file")
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Default for ProjectFixture {
    fn default() -> Self {
        Self::new()
    }
}
