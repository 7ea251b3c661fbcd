// src/consumer.rs

//! Consumer-side helpers for a running [`PollingWorker`](crate::worker::PollingWorker).

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::common::{record::LogRecord, sample::Sample, timestamp::Timestamp};
use crate::worker::WorkerHandle;

/// Yields each published sample once.
///
/// The worker's unread flag stays set once the first sample is out. This
/// remembers the timestamp last handed out and skips samples carrying it.
#[derive(Debug, Default)]
pub struct FreshSamples {
    last: Option<Timestamp>,
}

impl FreshSamples {
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest sample if it has not been returned before.
    pub fn poll(&mut self, worker: &WorkerHandle) -> Option<Sample> {
        let sample = worker.latest()?;
        if self.last == Some(sample.timestamp) {
            return None;
        }
        self.last = Some(sample.timestamp);
        Some(sample)
    }

    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.last
    }
}

/// Append-only CSV file of samples, one [`LogRecord`] per line.
#[derive(Debug, Clone)]
pub struct CsvLog {
    path: PathBuf,
}

impl CsvLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvLog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one line, creating the file if needed.
    pub fn append(&self, sample: &Sample) -> io::Result<()> {
        let line = LogRecord::new(sample).to_string();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        debug!("appended sample to {}", self.path.display());
        Ok(())
    }
}
