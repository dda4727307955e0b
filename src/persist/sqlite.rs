//! SQLite-backed append-only record table and offset table.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::{
    record::{TransmissionRecord, format_stored_timestamp, parse_stored_timestamp},
    types::Direction,
};

use super::{PersistError, PersistResult, RecordStore};

const RECORD_COLUMNS: &str = "timestamp, frequency, direction, snr, delta, dt, msg, call1, call2";

/// Column values as read, before domain conversion.
struct RawRow {
    timestamp: String,
    frequency: f64,
    direction: String,
    snr: i64,
    delta: f64,
    dt: i64,
    msg: String,
    call1: Option<String>,
    call2: Option<String>,
}

impl RawRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            timestamp: row.get(0)?,
            frequency: row.get(1)?,
            direction: row.get(2)?,
            snr: row.get(3)?,
            delta: row.get(4)?,
            dt: row.get(5)?,
            msg: row.get(6)?,
            call1: row.get(7)?,
            call2: row.get(8)?,
        })
    }

    fn into_record(self) -> PersistResult<TransmissionRecord> {
        let timestamp =
            parse_stored_timestamp(&self.timestamp).map_err(|source| PersistError::Timestamp {
                value: self.timestamp.clone(),
                source,
            })?;
        let direction = Direction::from_token(&self.direction).ok_or_else(|| {
            PersistError::Message(format!("unknown direction {:?}", self.direction))
        })?;
        let snr = i32::try_from(self.snr)
            .map_err(|_| PersistError::Message(format!("snr {} out of range", self.snr)))?;
        let audio_offset_hz = u32::try_from(self.dt)
            .map_err(|_| PersistError::Message(format!("dt {} out of range", self.dt)))?;

        Ok(TransmissionRecord {
            timestamp,
            frequency_mhz: self.frequency,
            direction,
            snr,
            time_offset_sec: self.delta,
            audio_offset_hz,
            message: self.msg,
            call_a: self.call1,
            call_b: self.call2,
        })
    }
}

/// SQLite implementation of [`RecordStore`].
pub struct SqliteRecordStore {
    conn: Connection,
}

impl SqliteRecordStore {
    /// Opens or creates a database at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory database.
    pub fn open_in_memory() -> PersistResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }

    /// Total number of stored records.
    pub fn record_count(&self) -> PersistResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM logs", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// Every stored record in insertion order.
    pub fn all_records(&self) -> PersistResult<Vec<TransmissionRecord>> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM logs ORDER BY id ASC");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], RawRow::from_row)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?.into_record()?);
        }
        Ok(out)
    }
}

impl RecordStore for SqliteRecordStore {
    fn append_batch(&mut self, records: &[TransmissionRecord]) -> PersistResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO logs ({RECORD_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
            ))?;
            for rec in records {
                stmt.execute(params![
                    format_stored_timestamp(&rec.timestamp),
                    rec.frequency_mhz,
                    rec.direction.as_str(),
                    i64::from(rec.snr),
                    rec.time_offset_sec,
                    i64::from(rec.audio_offset_hz),
                    rec.message,
                    rec.call_a,
                    rec.call_b,
                ])?;
            }
        }
        tx.commit()?;

        debug!(records = records.len(), "appended batch");
        Ok(records.len())
    }

    fn records_between(&self, x: &str, y: &str) -> PersistResult<Vec<TransmissionRecord>> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM logs
             WHERE (call1 = ?1 AND call2 = ?2) OR (call1 = ?2 AND call2 = ?1)
             ORDER BY timestamp ASC, id ASC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![x, y], RawRow::from_row)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?.into_record()?);
        }
        Ok(out)
    }

    fn peers_of(&self, operator: &str) -> PersistResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT peer FROM (
                 SELECT DISTINCT CASE WHEN call1 = ?1 THEN call2 ELSE call1 END AS peer
                 FROM logs
                 WHERE call1 = ?1 OR call2 = ?1
             )
             WHERE peer IS NOT NULL
             ORDER BY peer ASC",
        )?;
        let rows = stmt.query_map(params![operator], |row| row.get::<_, String>(0))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn load_offset(&self, source_id: &str) -> PersistResult<u64> {
        let offset: Option<i64> = self
            .conn
            .query_row(
                "SELECT last_offset FROM meta WHERE log_file = ?1",
                params![source_id],
                |row| row.get(0),
            )
            .optional()?;

        match offset {
            None => Ok(0),
            Some(v) => u64::try_from(v)
                .map_err(|_| PersistError::Message(format!("negative offset {v} for {source_id}"))),
        }
    }

    fn save_offset(&mut self, source_id: &str, offset: u64) -> PersistResult<()> {
        let offset = i64::try_from(offset)
            .map_err(|_| PersistError::Message(format!("offset {offset} exceeds INTEGER range")))?;
        self.conn.execute(
            "INSERT OR REPLACE INTO meta (log_file, last_offset) VALUES (?1, ?2)",
            params![source_id, offset],
        )?;
        Ok(())
    }
}
