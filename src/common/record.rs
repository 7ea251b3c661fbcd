// src/common/record.rs

//! Line format of the sample log.
//!
//! One record per sample: `timestamp,co2,temperature,humidity` followed by a
//! newline. Values carry six decimals, matching the existing log files.

use core::fmt;

use super::sample::Sample;

/// Borrowed view of a sample, formatted as one log line.
#[derive(Debug, Clone, Copy)]
pub struct LogRecord<'a>(&'a Sample);

impl<'a> LogRecord<'a> {
    pub fn new(sample: &'a Sample) -> Self {
        LogRecord(sample)
    }
}

impl fmt::Display for LogRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sample = self.0;
        writeln!(
            f,
            "{},{:.6},{:.6},{:.6}",
            sample.timestamp, sample.co2_ppm, sample.temperature, sample.humidity
        )
    }
}
