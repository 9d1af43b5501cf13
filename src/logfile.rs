//! Battery log parsing.
//!
//! The charge log is tab-delimited, one sample per line, at least six
//! columns. Column 0 is the unix timestamp, column 3 the current charge and
//! column 5 the capacity, both in whatever unit the battery driver reports;
//! only their ratio is used. The remaining columns are ignored.
//!
//! The timestamp is parsed before anything else and lines older than the
//! requested window are skipped without touching their other columns, so a
//! long log tail in an older format never fails the scan. A malformed line
//! inside the window is an error, and a window that parses cleanly but
//! holds no samples is not: that is a legitimate empty result.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::Context;
use thiserror::Error;

use crate::episode::Sample;
use crate::traits::SampleSource;

/// Field index of the unix timestamp.
const TIMESTAMP_FIELD: usize = 0;
/// Field index of the current charge.
const CHARGE_FIELD: usize = 3;
/// Field index of the capacity.
const CAPACITY_FIELD: usize = 5;
/// Columns a line inside the window must have.
const MIN_FIELDS: usize = CAPACITY_FIELD + 1;

/// A log that could not be read or parsed.
#[derive(Debug, Error)]
pub enum LogError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("line {line}: expected at least 6 tab-delimited fields, found {found}")]
    TooFewFields { line: usize, found: usize },
    #[error("line {line}: invalid timestamp {text:?}")]
    BadTimestamp { line: usize, text: String },
    #[error("line {line}: invalid numeric field {text:?}")]
    BadNumber { line: usize, text: String },
}

/// Parse the log, keeping samples with `timestamp >= start_time`.
/// Charge is converted to a percentage of capacity. Blank lines are
/// skipped.
pub fn read_log<R: BufRead>(input: R, start_time: i64) -> Result<Vec<Sample>, LogError> {
    let mut samples = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let lineno = index + 1;
        let fields: Vec<&str> = line.split('\t').collect();

        let ts_text = fields[TIMESTAMP_FIELD];
        let timestamp: i64 = ts_text.parse().map_err(|_| LogError::BadTimestamp {
            line: lineno,
            text: ts_text.to_string(),
        })?;
        if timestamp < start_time {
            continue;
        }

        if fields.len() < MIN_FIELDS {
            return Err(LogError::TooFewFields {
                line: lineno,
                found: fields.len(),
            });
        }
        let charge = parse_number(fields[CHARGE_FIELD], lineno)?;
        let capacity = parse_number(fields[CAPACITY_FIELD], lineno)?;
        samples.push(Sample::new(timestamp, 100.0 * charge / capacity));
    }
    Ok(samples)
}

/// Open `path` and parse it with [`read_log`].
pub fn read_log_file(path: &Path, start_time: i64) -> Result<Vec<Sample>, LogError> {
    let file = File::open(path)?;
    read_log(BufReader::new(file), start_time)
}

fn parse_number(text: &str, lineno: usize) -> Result<f64, LogError> {
    text.parse().map_err(|_| LogError::BadNumber {
        line: lineno,
        text: text.to_string(),
    })
}

/// Produces samples from the on-disk battery log.
pub struct LogSource {
    path: PathBuf,
    start_time: i64,
}

impl LogSource {
    pub fn new(path: PathBuf, start_time: i64) -> Self {
        LogSource { path, start_time }
    }
}

impl SampleSource for LogSource {
    fn samples(&mut self) -> anyhow::Result<Vec<Sample>> {
        read_log_file(&self.path, self.start_time)
            .with_context(|| format!("reading battery log {}", self.path.display()))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn pairs(samples: &[Sample]) -> Vec<(i64, f64)> {
        samples.iter().map(|s| (s.timestamp, s.value)).collect()
    }

    #[test]
    fn test_parse_basic_lines() {
        let log = "100\tBAT0\tDischarging\t30\t.\t60\n\
                   160\tBAT0\tDischarging\t15\t.\t60\n";
        let samples = read_log(log.as_bytes(), 0).unwrap();
        assert_eq!(pairs(&samples), vec![(100, 50.0), (160, 25.0)]);
    }

    #[test]
    fn test_window_filters_old_samples() {
        let log = "100\tBAT0\tFull\t60\t.\t60\n\
                   200\tBAT0\tDischarging\t30\t.\t60\n\
                   300\tBAT0\tDischarging\t15\t.\t60\n";
        let samples = read_log(log.as_bytes(), 200).unwrap();
        assert_eq!(pairs(&samples), vec![(200, 50.0), (300, 25.0)]);
    }

    #[test]
    fn test_old_lines_skipped_before_field_checks() {
        // A short line in the old part of the log must not fail a scan
        // whose window starts after it.
        let log = "100\toldformat\n\
                   200\tBAT0\tDischarging\t30\t.\t60\n";
        let samples = read_log(log.as_bytes(), 150).unwrap();
        assert_eq!(pairs(&samples), vec![(200, 50.0)]);
    }

    #[test]
    fn test_too_few_fields_inside_window() {
        let log = "100\tBAT0\tDischarging\t30\t.\t60\n\
                   200\tBAT0\t30\n";
        let err = read_log(log.as_bytes(), 0).unwrap_err();
        match err {
            LogError::TooFewFields { line, found } => {
                assert_eq!(line, 2);
                assert_eq!(found, 3);
            }
            other => panic!("expected TooFewFields, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_timestamp() {
        let log = "garbage\tBAT0\tDischarging\t30\t.\t60\n";
        let err = read_log(log.as_bytes(), 0).unwrap_err();
        match err {
            LogError::BadTimestamp { line, text } => {
                assert_eq!(line, 1);
                assert_eq!(text, "garbage");
            }
            other => panic!("expected BadTimestamp, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_charge_field() {
        let log = "100\tBAT0\tDischarging\tnotanumber\t.\t60\n";
        let err = read_log(log.as_bytes(), 0).unwrap_err();
        match err {
            LogError::BadNumber { line, text } => {
                assert_eq!(line, 1);
                assert_eq!(text, "notanumber");
            }
            other => panic!("expected BadNumber, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input_is_empty_result() {
        let samples = read_log("".as_bytes(), 0).unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn test_blank_lines_skipped() {
        let log = "100\tBAT0\tFull\t60\t.\t60\n\n200\tBAT0\tFull\t60\t.\t60\n";
        let samples = read_log(log.as_bytes(), 0).unwrap();
        assert_eq!(samples.len(), 2);
    }

    #[test]
    fn test_fractional_charge_values() {
        let log = "100\tBAT0\tDischarging\t41.7\t.\t50.0\n";
        let samples = read_log(log.as_bytes(), 0).unwrap();
        assert_eq!(samples.len(), 1);
        assert!((samples[0].value - 83.4).abs() < 1e-9);
    }

    #[test]
    fn test_read_log_file_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "100\tBAT0\tFull\t60\t.\t60").unwrap();
        writeln!(file, "200\tBAT0\tDischarging\t30\t.\t60").unwrap();
        file.flush().unwrap();

        let samples = read_log_file(file.path(), 0).unwrap();
        assert_eq!(pairs(&samples), vec![(100, 100.0), (200, 50.0)]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_log_file(Path::new("/nonexistent/battery.tsv"), 0).unwrap_err();
        assert!(matches!(err, LogError::Io(_)));
    }

    #[test]
    fn test_log_source_attaches_path_context() {
        let mut source = LogSource::new(PathBuf::from("/nonexistent/battery.tsv"), 0);
        let err = source.samples().unwrap_err();
        assert!(err.to_string().contains("/nonexistent/battery.tsv"));
    }
}
