//! Record store abstraction and SQLite implementation.

/// SQLite-backed [`RecordStore`].
pub mod sqlite;

use thiserror::Error;

use crate::record::TransmissionRecord;

/// Storage failure.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Driver or constraint error.
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored timestamp did not round-trip.
    #[error("stored timestamp {value:?} is malformed: {source}")]
    Timestamp {
        /// Column text as stored.
        value: String,
        /// Parse failure.
        source: chrono::ParseError,
    },
    /// Any other storage failure.
    #[error("{0}")]
    Message(String),
}

/// Result alias for store operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Append-only record table plus per-source resume offsets.
pub trait RecordStore {
    /// Appends `records` all-or-nothing. Returns the number stored.
    fn append_batch(&mut self, records: &[TransmissionRecord]) -> PersistResult<usize>;

    /// Records whose call pair is `{x, y}` in either order, oldest first.
    /// Equal timestamps keep insertion order.
    fn records_between(&self, x: &str, y: &str) -> PersistResult<Vec<TransmissionRecord>>;

    /// Distinct non-empty peers that share a record with `operator`, sorted.
    fn peers_of(&self, operator: &str) -> PersistResult<Vec<String>>;

    /// Persisted resume offset for `source_id`, 0 when never ingested.
    fn load_offset(&self, source_id: &str) -> PersistResult<u64>;

    /// Upserts the resume offset for `source_id`.
    fn save_offset(&mut self, source_id: &str, offset: u64) -> PersistResult<()>;
}
