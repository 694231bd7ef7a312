//! Observed meteorological time series (`mettimeseries.dat`).
//!
//! Each line carries `date, hour, speed, direction, stability`. The date
//! token has no year (`dd.mm`); the year is synthesized downstream.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{MetfileError, MetfileResult};
use crate::fields::{split_date, split_fields};

/// One observed record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservedRecord {
    /// Date token as written in the input, e.g. `01.06`
    pub date: String,
    /// Time-of-day token as written in the input, e.g. `13`
    pub time: String,
    /// Month number taken from the second part of the date token
    pub month: i32,
    pub speed: f64,
    pub direction: f64,
    pub stability: i32,
}

impl ObservedRecord {
    /// Parse one time-series line.
    pub fn parse(line: &str, line_number: usize) -> MetfileResult<Self> {
        let fields = split_fields(line);
        if fields.len() < 5 {
            return Err(MetfileError::malformed_record(
                line_number,
                format!("expected 5 fields, got {}", fields.len()),
            ));
        }

        let date_parts = split_date(fields[0]);
        let month = date_parts
            .get(1)
            .ok_or_else(|| {
                MetfileError::malformed_record(
                    line_number,
                    format!("date '{}' has no month", fields[0]),
                )
            })?
            .parse::<i32>()
            .map_err(|e| MetfileError::malformed_record(line_number, format!("month: {}", e)))?;

        let speed = fields[2].parse::<f64>().map_err(|e| {
            MetfileError::malformed_record(line_number, format!("speed '{}': {}", fields[2], e))
        })?;
        let direction = fields[3].parse::<f64>().map_err(|e| {
            MetfileError::malformed_record(line_number, format!("direction '{}': {}", fields[3], e))
        })?;
        let stability = fields[4].parse::<i32>().map_err(|e| {
            MetfileError::malformed_record(line_number, format!("stability '{}': {}", fields[4], e))
        })?;

        Ok(Self {
            date: fields[0].to_string(),
            time: fields[1].to_string(),
            month,
            speed,
            direction,
            stability,
        })
    }
}

/// An observed series, cut at the first malformed line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservedSeries {
    pub records: Vec<ObservedRecord>,
    /// Line number of the record that stopped parsing, if any
    pub malformed_line: Option<usize>,
}

impl ObservedSeries {
    /// Parse lines until the first malformed one. Blank lines are skipped.
    pub fn parse_lines<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut series = Self::default();
        for (index, line) in lines.into_iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match ObservedRecord::parse(line, index + 1) {
                Ok(record) => series.records.push(record),
                Err(e) => {
                    tracing::warn!(error = %e, "Stopping time series at malformed record");
                    series.malformed_line = Some(index + 1);
                    break;
                }
            }
        }
        series
    }

    /// Read a `mettimeseries.dat` file.
    pub fn read(path: &Path) -> MetfileResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| MetfileError::read(path, e))?;
        let series = Self::parse_lines(content.lines());
        tracing::debug!(
            path = %path.display(),
            records = series.records.len(),
            "Read observed time series"
        );
        Ok(series)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_truncated(&self) -> bool {
        self.malformed_line.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record() {
        let record = ObservedRecord::parse("01.06,13,2.01,180.02,3", 1).unwrap();
        assert_eq!(record.date, "01.06");
        assert_eq!(record.time, "13");
        assert_eq!(record.month, 6);
        assert_eq!(record.speed, 2.01);
        assert_eq!(record.direction, 180.02);
        assert_eq!(record.stability, 3);
    }

    #[test]
    fn test_parse_record_missing_month() {
        let err = ObservedRecord::parse("0106,13,2.0,180,3", 7).unwrap_err();
        assert!(matches!(err, MetfileError::MalformedRecord { line: 7, .. }));
    }

    #[test]
    fn test_series_stops_at_first_malformed_line() {
        let series = ObservedSeries::parse_lines([
            "01.01,00,1.0,270,4",
            "01.01,01,n/a,270,4",
            "01.01,02,1.0,270,4",
        ]);
        assert_eq!(series.len(), 1);
        assert_eq!(series.malformed_line, Some(2));
        assert!(series.is_truncated());
    }

    #[test]
    fn test_series_skips_blank_lines() {
        let series = ObservedSeries::parse_lines(["01.01,00,1.0,270,4", "", "01.01,01,1.0,270,4"]);
        assert_eq!(series.len(), 2);
        assert!(!series.is_truncated());
    }
}
