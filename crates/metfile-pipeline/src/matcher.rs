//! Matching of observed records to tabulated situations.

use std::fmt;

use metfile_common::{ObservedRecord, ObservedSeries, SituationTable};

use crate::sampler::SampledResult;

/// Maximum absolute difference in speed and direction for a situation to
/// match an observed record.
pub const MATCH_TOLERANCE: f64 = 0.05;

/// First year of the synthesized calendar.
pub const FIRST_FICTITIOUS_YEAR: i32 = 1901;

/// Synthesizes a year for time series that only carry day and month.
///
/// The year advances whenever the month goes backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FictitiousYear {
    year: i32,
    previous_month: i32,
}

impl Default for FictitiousYear {
    fn default() -> Self {
        Self {
            year: FIRST_FICTITIOUS_YEAR,
            previous_month: 1,
        }
    }
}

impl FictitiousYear {
    pub fn new() -> Self {
        Self::default()
    }

    /// Year of a record in `month`.
    pub fn next(&mut self, month: i32) -> i32 {
        if month < self.previous_month {
            self.year += 1;
        }
        self.previous_month = month;
        self.year
    }
}

/// An observed record with its synthesized timestamp and matched situation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRecord {
    /// `date.year`
    pub date: String,
    /// `time:00`
    pub time: String,
    /// 0-based situation index
    pub situation: usize,
}

/// One line of a meteo file.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
    pub date: String,
    pub time: String,
    /// Rounded to two decimals
    pub speed: f64,
    pub direction: f32,
    pub stability: i32,
}

impl OutputRecord {
    pub fn new(matched: &MatchedRecord, sampled: SampledResult) -> Self {
        Self {
            date: matched.date.clone(),
            time: matched.time.clone(),
            speed: round_to_hundredths(sampled.speed),
            direction: sampled.direction,
            stability: sampled.stability,
        }
    }
}

impl fmt::Display for OutputRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{}",
            self.date, self.time, self.speed, self.direction, self.stability
        )
    }
}

fn round_to_hundredths(value: f32) -> f64 {
    (f64::from(value) * 100.0).round_ties_even() / 100.0
}

/// Finds the situation of each observed record.
#[derive(Debug, Clone, Copy)]
pub struct TimeSeriesMatcher<'a> {
    table: &'a SituationTable,
}

impl<'a> TimeSeriesMatcher<'a> {
    pub fn new(table: &'a SituationTable) -> Self {
        Self { table }
    }

    /// Index of the first situation within tolerance of `record`, or 0 when
    /// none matches.
    pub fn find_situation(&self, record: &ObservedRecord) -> usize {
        (0..self.table.len())
            .find(|index| self.matches(record, *index))
            .unwrap_or(0)
    }

    /// Match every record of a series, synthesizing years in order.
    pub fn match_series(&self, series: &ObservedSeries) -> Vec<MatchedRecord> {
        let mut year = FictitiousYear::new();
        let mut unmatched = 0usize;

        let matched: Vec<MatchedRecord> = series
            .records
            .iter()
            .map(|record| {
                let situation = self.find_situation(record);
                if situation == 0 && !self.matches(record, 0) {
                    unmatched += 1;
                }
                MatchedRecord {
                    date: format!("{}.{}", record.date, year.next(record.month)),
                    time: format!("{}:00", record.time),
                    situation,
                }
            })
            .collect();

        if unmatched > 0 {
            tracing::warn!(
                unmatched,
                total = matched.len(),
                "Observed records without a matching situation were assigned situation 1"
            );
        }

        matched
    }

    fn matches(&self, record: &ObservedRecord, index: usize) -> bool {
        self.table.get(index).is_some_and(|row| {
            (record.speed - row.speed).abs() < MATCH_TOLERANCE
                && (record.direction - row.direction).abs() < MATCH_TOLERANCE
                && record.stability == row.stability
        })
    }
}

/// Output lines of one point.
pub fn build_records(matched: &[MatchedRecord], sampled: &[SampledResult]) -> Vec<OutputRecord> {
    matched
        .iter()
        .map(|m| OutputRecord::new(m, sampled.get(m.situation).copied().unwrap_or_default()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use metfile_common::SituationRow;

    fn record(line: &str) -> ObservedRecord {
        ObservedRecord::parse(line, 1).unwrap()
    }

    #[test]
    fn test_year_rolls_over() {
        let mut year = FictitiousYear::new();
        let years: Vec<i32> = [12, 1, 2].iter().map(|m| year.next(*m)).collect();
        assert_eq!(years, vec![1901, 1902, 1902]);
    }

    #[test]
    fn test_year_stays_within_ascending_months() {
        let mut year = FictitiousYear::new();
        let years: Vec<i32> = [1, 1, 6, 6, 12].iter().map(|m| year.next(*m)).collect();
        assert!(years.iter().all(|y| *y == 1901));
    }

    #[test]
    fn test_first_match_wins() {
        let table = SituationTable::new(vec![
            SituationRow::new(180.0, 2.0, 3),
            SituationRow::new(180.04, 2.04, 3),
        ]);
        let matcher = TimeSeriesMatcher::new(&table);
        // within tolerance of both rows
        assert_eq!(matcher.find_situation(&record("01.06,00,2.03,180.03,3")), 0);
        // only the second row
        assert_eq!(matcher.find_situation(&record("01.06,00,2.08,180.08,3")), 1);
    }

    #[test]
    fn test_no_match_falls_back_to_first() {
        let table = SituationTable::new(vec![
            SituationRow::new(90.0, 1.0, 4),
            SituationRow::new(180.0, 2.0, 3),
        ]);
        let matcher = TimeSeriesMatcher::new(&table);
        assert_eq!(matcher.find_situation(&record("01.06,00,2.0,180.0,5")), 0);
    }

    #[test]
    fn test_round_trip_line() {
        let table = SituationTable::new(vec![SituationRow::new(180.0, 2.0, 3)]);
        let series = ObservedSeries::parse_lines(["01.06,00,2.01,180.02,3"]);
        let matched = TimeSeriesMatcher::new(&table).match_series(&series);

        assert_eq!(
            matched,
            vec![MatchedRecord {
                date: "01.06.1901".to_string(),
                time: "00:00".to_string(),
                situation: 0,
            }]
        );

        let sampled = [SampledResult {
            speed: 2.0149,
            direction: 180.02,
            stability: 3,
        }];
        let lines: Vec<String> = build_records(&matched, &sampled)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(lines, vec!["01.06.1901,00:00,2.01,180.02,3"]);
    }

    #[test]
    fn test_speed_rounding_shortest_form() {
        assert_eq!(round_to_hundredths(2.0).to_string(), "2");
        assert_eq!(round_to_hundredths(3.456).to_string(), "3.46");
        assert_eq!(round_to_hundredths(0.0).to_string(), "0");
    }

    #[test]
    fn test_output_line_format() {
        let matched = MatchedRecord {
            date: "24.12.1902".to_string(),
            time: "13:00".to_string(),
            situation: 0,
        };
        let line = OutputRecord::new(
            &matched,
            SampledResult {
                speed: 1.5,
                direction: 270.0,
                stability: 7,
            },
        )
        .to_string();
        assert_eq!(line, "24.12.1902,13:00,1.5,270,7");
    }
}
