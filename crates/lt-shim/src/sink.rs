//! Destinations for shim records.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::record::ShimRecord;

/// Accepts records from shims. Implementations must be fast; they run inside
/// the control cycle.
pub trait LogSink: Send + Sync {
    fn emit(&self, record: &ShimRecord);
}

/// Forwards records to `tracing` under the `lt_shim` target.
///
/// Entry markers and samples go out at `INFO`, samples carrying the values
/// as structured fields. Failures go out at `WARN`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, record: &ShimRecord) {
        match record {
            ShimRecord::Entry(site) => {
                tracing::info!(target: "lt_shim", "{site}");
            }
            ShimRecord::Source(sample) => {
                tracing::info!(
                    target: "lt_shim",
                    setpoint = sample.setpoint,
                    measurement = sample.measurement,
                    error = sample.error,
                    "{sample}"
                );
            }
            ShimRecord::Output(sample) => {
                tracing::info!(
                    target: "lt_shim",
                    setpoint = ?sample.setpoint,
                    command = sample.command,
                    "{sample}"
                );
            }
            ShimRecord::Failure { .. } => {
                tracing::warn!(target: "lt_shim", "{record}");
            }
        }
    }
}

/// Discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn emit(&self, _record: &ShimRecord) {}
}

/// Keeps formatted lines in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all lines captured so far.
    pub fn lines(&self) -> Vec<String> {
        self.buffer().clone()
    }

    pub fn len(&self) -> usize {
        self.buffer().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer().is_empty()
    }

    pub fn clear(&self) {
        self.buffer().clear();
    }

    // A panic elsewhere must not stop the loop from logging.
    fn buffer(&self) -> MutexGuard<'_, Vec<String>> {
        self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LogSink for MemorySink {
    fn emit(&self, record: &ShimRecord) {
        self.buffer().push(record.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SourceSample;

    #[test]
    fn memory_sink_clones_share_lines() {
        let sink = MemorySink::new();
        let other = sink.clone();
        other.emit(&ShimRecord::Source(SourceSample::new(1.0, 0.5)));

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.lines(), vec!["sp=1.000 src=0.500 err=0.500".to_string()]);

        sink.clear();
        assert!(other.is_empty());
    }

    #[test]
    fn null_and_tracing_sinks_accept_records() {
        let record = ShimRecord::Source(SourceSample::new(0.0, 0.0));
        NullSink.emit(&record);
        TracingSink.emit(&record);
    }
}
