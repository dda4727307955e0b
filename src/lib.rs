//! FT8 log ingestion and QSO session reconstruction.
//!
//! Log lines are parsed into [`record::TransmissionRecord`]s, appended to a
//! [`persist::RecordStore`] in batches while a per-source byte offset lets the
//! next run resume where this one stopped, and then grouped per peer into
//! [`session::Session`]s by a time-gap rule.
//!
//! # Examples
//!
//! Ingest from memory and reconstruct sessions with [`core::store::MemoryRecordStore`]:
//! ```
//! use std::io::Cursor;
//!
//! use ft8qso::{
//!     config::AppConfig,
//!     core::store::MemoryRecordStore,
//!     ingest::controller::Ingestor,
//!     parse::LineParser,
//!     query::QsoQuery,
//!     session::SessionReconstructor,
//! };
//!
//! let log = "\
//! 240101_120015 14.074 Rx FT8 -10 0.2 1501 N1ZZT W2ABC -08
//! 240101_120030 14.074 Tx FT8 -5 0.1 1500 W2ABC N1ZZT R-05
//! ";
//!
//! let cfg = AppConfig::default();
//! let mut store = MemoryRecordStore::new();
//! let report = Ingestor::new(&mut store, LineParser::new(&cfg.parser), cfg.ingest.clone())
//!     .ingest("ALL.TXT", Cursor::new(log))
//!     .expect("ingest");
//! assert_eq!(report.records_stored, 2);
//!
//! let reconstructor = SessionReconstructor::new(&cfg.station, cfg.bands.clone());
//! let query = QsoQuery::new(&store, &cfg.station.operator_call, reconstructor);
//! let sessions = query.sessions_with("w2abc").expect("query");
//! assert_eq!(sessions.len(), 1);
//! assert_eq!(sessions[0].band, "20m");
//! assert_eq!(sessions[0].signal_tokens, vec!["-08", "R-05"]);
//! ```
//!
//! On-disk usage with SQLite:
//! ```no_run
//! use ft8qso::{
//!     config::AppConfig,
//!     ingest::controller::Ingestor,
//!     parse::LineParser,
//!     persist::sqlite::SqliteRecordStore,
//! };
//!
//! let cfg = AppConfig::default();
//! let mut store = SqliteRecordStore::open("wsjtx_logs.db").expect("open sqlite");
//! let report = Ingestor::new(&mut store, LineParser::new(&cfg.parser), cfg.ingest.clone())
//!     .ingest_path("ALL.TXT")
//!     .expect("ingest");
//! println!("stored {} records", report.records_stored);
//! ```
#![warn(missing_docs)]

/// Application configuration and band plan.
pub mod config;
/// In-memory record store and index helpers.
pub mod core;
/// Resumable batched ingestion.
pub mod ingest;
/// Log line parser and call-sign heuristic.
pub mod parse;
/// Record store abstraction and SQLite implementation.
pub mod persist;
/// Session lookup façade and filters.
pub mod query;
/// Decoded transmission record.
pub mod record;
/// Plain-text session reports.
pub mod report;
/// Session reconstruction.
pub mod session;
/// Shared primitive types and enums.
pub mod types;
