use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    config::IngestConfig,
    parse::LineParser,
    persist::{PersistError, RecordStore},
    record::TransmissionRecord,
    types::SourceId,
};

use super::events::{IngestEvent, percent_of};

/// Failure that aborts an ingestion run. The persisted offset is left untouched.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The log source is missing or unreadable.
    #[error("log source {source_id} is unreadable: {source}")]
    Source {
        /// Source being read.
        source_id: SourceId,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// A batch or offset write failed.
    #[error("storage failure: {0}")]
    Persist(#[from] PersistError),
}

/// Outcome of one successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// Source that was read.
    pub source_id: SourceId,
    /// Offset the run resumed from.
    pub start_offset: u64,
    /// Offset persisted at the end of the run.
    pub end_offset: u64,
    /// Source size measured when the run started.
    pub total_bytes: u64,
    /// Lines read, accepted or not.
    pub lines_read: u64,
    /// Lines that did not match the expected shape.
    pub lines_rejected: u64,
    /// Records appended to the store.
    pub records_stored: u64,
    /// Store flushes performed.
    pub batches: u64,
}

type Observer<'s> = Box<dyn FnMut(&IngestEvent) + 's>;

/// Reads a log source from its persisted offset and appends parsed records.
///
/// Records are flushed in batches of [`IngestConfig::batch_size`]; the new
/// offset is persisted once, after the last flush succeeds. A crash or storage
/// failure mid-run leaves the previous offset in place, so the unflushed tail
/// is re-read next time and already-flushed batches may be stored twice.
pub struct Ingestor<'s, S: RecordStore> {
    store: &'s mut S,
    parser: LineParser,
    cfg: IngestConfig,
    observer: Option<Observer<'s>>,
}

impl<'s, S: RecordStore> Ingestor<'s, S> {
    /// Creates an ingestor writing into `store`.
    pub fn new(store: &'s mut S, parser: LineParser, cfg: IngestConfig) -> Self {
        Self {
            store,
            parser,
            cfg,
            observer: None,
        }
    }

    /// Registers a callback receiving every [`IngestEvent`].
    pub fn with_observer(mut self, observer: impl FnMut(&IngestEvent) + 's) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Opens `path` and ingests it, using the path text as the source id.
    pub fn ingest_path(&mut self, path: impl AsRef<Path>) -> Result<IngestReport, IngestError> {
        let path = path.as_ref();
        let source_id = path.display().to_string();
        let file = File::open(path).map_err(|source| IngestError::Source {
            source_id: source_id.clone(),
            source,
        })?;
        self.ingest(&source_id, BufReader::new(file))
    }

    /// Ingests `reader` from the offset persisted for `source_id`.
    pub fn ingest<R: BufRead + Seek>(
        &mut self,
        source_id: &str,
        mut reader: R,
    ) -> Result<IngestReport, IngestError> {
        let source_err = |source: io::Error| IngestError::Source {
            source_id: source_id.to_string(),
            source,
        };

        let start_offset = self.store.load_offset(source_id)?;
        // Only used for progress; the read loop runs until the reader is exhausted.
        let total_bytes = reader.seek(SeekFrom::End(0)).map_err(source_err)?;

        info!(source = source_id, offset = start_offset, total_bytes, "starting ingestion");
        self.emit(IngestEvent::Started {
            source_id: source_id.to_string(),
            offset: start_offset,
            total_bytes,
        });
        if start_offset > total_bytes {
            warn!(
                source = source_id,
                offset = start_offset,
                total_bytes,
                "persisted offset is past the end of the source; keeping it"
            );
        }

        reader
            .seek(SeekFrom::Start(start_offset))
            .map_err(source_err)?;

        let mut report = IngestReport {
            source_id: source_id.to_string(),
            start_offset,
            end_offset: start_offset,
            total_bytes,
            lines_read: 0,
            lines_rejected: 0,
            records_stored: 0,
            batches: 0,
        };
        let mut pending: Vec<TransmissionRecord> = Vec::with_capacity(self.cfg.batch_size);
        let mut buf: Vec<u8> = Vec::new();
        let mut position = start_offset;
        let mut last_progress = Instant::now();
        let interval = self.cfg.progress_interval();

        loop {
            buf.clear();
            let n = reader.read_until(b'\n', &mut buf).map_err(source_err)?;
            if n == 0 {
                break;
            }
            let line_start = position;
            position += n as u64;
            report.lines_read += 1;

            match self.parser.parse(&String::from_utf8_lossy(&buf)) {
                Some(rec) => pending.push(rec),
                None => report.lines_rejected += 1,
            }

            if last_progress.elapsed() >= interval {
                let percent = percent_of(line_start, total_bytes);
                info!(source = source_id, position = line_start, total_bytes, "progress {percent:.2}%");
                self.emit(IngestEvent::Progress {
                    position: line_start,
                    total_bytes,
                    percent,
                });
                last_progress = Instant::now();
            }

            if pending.len() >= self.cfg.batch_size {
                self.flush(&mut pending, &mut report)?;
            }
        }

        self.flush(&mut pending, &mut report)?;

        self.store.save_offset(source_id, position)?;
        report.end_offset = position;

        info!(
            source = source_id,
            records = report.records_stored,
            rejected = report.lines_rejected,
            offset = position,
            "ingestion complete"
        );
        self.emit(IngestEvent::Completed {
            records_stored: report.records_stored,
            offset: position,
        });
        Ok(report)
    }

    fn flush(
        &mut self,
        pending: &mut Vec<TransmissionRecord>,
        report: &mut IngestReport,
    ) -> Result<(), IngestError> {
        if pending.is_empty() {
            return Ok(());
        }
        let stored = self.store.append_batch(pending.as_slice())?;
        report.records_stored += stored as u64;
        report.batches += 1;
        debug!(records = stored, total = report.records_stored, "flushed batch");
        self.emit(IngestEvent::BatchStored { records: stored });
        pending.clear();
        Ok(())
    }

    fn emit(&mut self, event: IngestEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&event);
        }
    }
}
