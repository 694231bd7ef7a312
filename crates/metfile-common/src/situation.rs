//! The table of precomputed meteorological situations (`meteopgt.all`).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{MetfileError, MetfileResult};
use crate::fields::split_fields;

/// Number of header lines preceding the situation rows in `meteopgt.all`.
pub const SITUATION_HEADER_LINES: usize = 2;

/// One precomputed situation: the reference inflow used by the wind-field run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SituationRow {
    pub direction: f64,
    pub speed: f64,
    pub stability: i32,
}

impl SituationRow {
    pub fn new(direction: f64, speed: f64, stability: i32) -> Self {
        Self {
            direction,
            speed,
            stability,
        }
    }

    /// Parse a `direction, speed, stability[, frequency]` row.
    pub fn parse(line: &str, line_number: usize) -> MetfileResult<Self> {
        let fields = split_fields(line);
        if fields.len() < 3 {
            return Err(MetfileError::malformed_situation(
                line_number,
                format!("expected at least 3 fields, got {}", fields.len()),
            ));
        }

        let direction = fields[0].parse::<f64>().map_err(|e| {
            MetfileError::malformed_situation(
                line_number,
                format!("direction '{}': {}", fields[0], e),
            )
        })?;
        let speed = fields[1].parse::<f64>().map_err(|e| {
            MetfileError::malformed_situation(line_number, format!("speed '{}': {}", fields[1], e))
        })?;
        let stability = fields[2].parse::<i32>().map_err(|e| {
            MetfileError::malformed_situation(
                line_number,
                format!("stability '{}': {}", fields[2], e),
            )
        })?;

        Ok(Self::new(direction, speed, stability))
    }
}

/// Ordered situation rows. Row `i` (0-based) is situation `i + 1` in the
/// flow-field file names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SituationTable {
    rows: Vec<SituationRow>,
}

impl SituationTable {
    pub fn new(rows: Vec<SituationRow>) -> Self {
        Self { rows }
    }

    /// Parse situation rows, skipping blank lines.
    ///
    /// `first_line` is the 1-based line number of the first item, used in
    /// error messages.
    pub fn parse_lines<'a, I>(lines: I, first_line: usize) -> MetfileResult<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut rows = Vec::new();
        for (offset, line) in lines.into_iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            rows.push(SituationRow::parse(line, first_line + offset)?);
        }
        Ok(Self { rows })
    }

    /// Read a `meteopgt.all` file.
    pub fn read(path: &Path) -> MetfileResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| MetfileError::read(path, e))?;
        let table = Self::parse_lines(
            content.lines().skip(SITUATION_HEADER_LINES),
            SITUATION_HEADER_LINES + 1,
        )?;
        tracing::debug!(path = %path.display(), situations = table.len(), "Read situation table");
        Ok(table)
    }

    pub fn rows(&self) -> &[SituationRow] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&SituationRow> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SituationRow> {
        self.rows.iter()
    }
}
