//! One filter pass: producer → episode extraction → writer.

use std::io::Write;

use anyhow::Result;
use chrono::{Local, TimeZone};
use log::{debug, info};

use crate::config::FilterConfig;
use crate::episode::last_episode;
use crate::output::write_samples;
use crate::traits::SampleSource;

/// Counters from one filter pass, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStats {
    /// Samples the producer yielded after window filtering.
    pub scanned: usize,
    /// Samples selected for output.
    pub selected: usize,
}

/// Read samples from `source`, select the last unplugged period and write
/// it to `out` as tab-delimited lines.
pub fn run<S, W>(source: &mut S, out: &mut W, config: &FilterConfig) -> Result<RunStats>
where
    S: SampleSource + ?Sized,
    W: Write + ?Sized,
{
    let samples = source.samples()?;
    debug!("{} samples in window", samples.len());

    let selected = last_episode(&samples, config);
    match (selected.first(), selected.last()) {
        (Some(first), Some(last)) => info!(
            "Selected {} of {} samples ({} to {})",
            selected.len(),
            samples.len(),
            format_timestamp(first.timestamp),
            format_timestamp(last.timestamp)
        ),
        _ => info!("No unplugged period among {} samples", samples.len()),
    }

    write_samples(out, &selected)?;
    Ok(RunStats {
        scanned: samples.len(),
        selected: selected.len(),
    })
}

fn format_timestamp(timestamp: i64) -> String {
    match Local.timestamp_opt(timestamp, 0).single() {
        Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => timestamp.to_string(),
    }
}
