//! Ingestion progress payloads.

use crate::types::SourceId;

/// Events emitted while a source is being ingested.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestEvent {
    /// A run is starting.
    Started {
        /// Source being read.
        source_id: SourceId,
        /// Persisted offset the run resumes from.
        offset: u64,
        /// Source size measured at start.
        total_bytes: u64,
    },
    /// Periodic read position, at most once per progress interval.
    Progress {
        /// Byte position of the line about to be read.
        position: u64,
        /// Source size measured at start.
        total_bytes: u64,
        /// `position / total_bytes`, as a percentage.
        percent: f64,
    },
    /// A batch reached the store.
    BatchStored {
        /// Records in this batch.
        records: usize,
    },
    /// The run finished and its offset was persisted.
    Completed {
        /// Records stored by this run.
        records_stored: u64,
        /// Offset now persisted for the source.
        offset: u64,
    },
}

/// Percentage of `total` represented by `position`. An empty source counts as done.
pub fn percent_of(position: u64, total: u64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (position as f64 / total as f64) * 100.0
}
