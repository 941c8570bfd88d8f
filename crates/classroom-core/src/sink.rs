//! Log Sinks
//!
//! Destinations for the per-agent record stream.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use classroom_events::LogRecord;

use crate::error::SimResult;

/// Receives agent records in tick order, agents in id order within a tick.
pub trait LogSink {
    fn record(&mut self, record: &LogRecord) -> SimResult<()>;

    fn record_batch(&mut self, records: &[LogRecord]) -> SimResult<()> {
        for record in records {
            self.record(record)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> SimResult<()> {
        Ok(())
    }

    /// Records received so far
    fn record_count(&self) -> u64;
}

/// Keeps every record in memory. Used for replay comparison.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<LogRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    /// Rendered `agent|tick|level|message` lines
    pub fn lines(&self) -> Vec<String> {
        self.records.iter().map(ToString::to_string).collect()
    }
}

impl LogSink for MemorySink {
    fn record(&mut self, record: &LogRecord) -> SimResult<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn record_count(&self) -> u64 {
        self.records.len() as u64
    }
}

/// Discards records, only counting them.
#[derive(Debug, Default)]
pub struct NullSink {
    count: u64,
}

impl NullSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LogSink for NullSink {
    fn record(&mut self, _record: &LogRecord) -> SimResult<()> {
        self.count += 1;
        Ok(())
    }

    fn record_count(&self) -> u64 {
        self.count
    }
}

/// Append-only JSON lines file.
pub struct JsonlSink {
    writer: BufWriter<File>,
    count: u64,
}

impl JsonlSink {
    /// Create the file at `path`, truncating any previous run.
    pub fn create(path: impl AsRef<Path>) -> SimResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
            count: 0,
        })
    }
}

impl LogSink for JsonlSink {
    fn record(&mut self, record: &LogRecord) -> SimResult<()> {
        let json = serde_json::to_string(record)?;
        writeln!(self.writer, "{}", json)?;
        self.count += 1;
        Ok(())
    }

    fn flush(&mut self) -> SimResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn record_count(&self) -> u64 {
        self.count
    }
}

impl Drop for JsonlSink {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            tracing::warn!("Failed to flush record log: {}", e);
        }
    }
}
