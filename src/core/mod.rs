//! In-memory record store and index helpers.

/// Helper index aliases.
pub mod indices;
/// In-memory [`crate::persist::RecordStore`].
pub mod store;
