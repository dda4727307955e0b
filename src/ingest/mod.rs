//! Resumable, batched log ingestion.

/// Ingestion controller and run report.
pub mod controller;
/// Progress events emitted during a run.
pub mod events;
