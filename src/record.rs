//! Decoded transmission record and its timestamp text forms.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CallSign, Direction};

/// Fixed-width timestamp format used by the logging program (`240101_120000`).
pub const LOG_TIMESTAMP_FORMAT: &str = "%y%m%d_%H%M%S";
/// ISO-8601 form stored in the `timestamp` column. Sorts lexicographically.
pub const STORED_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One accepted log line. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransmissionRecord {
    /// UTC instant, second precision.
    pub timestamp: DateTime<Utc>,
    /// Dial frequency in MHz.
    pub frequency_mhz: f64,
    /// Sent or received.
    pub direction: Direction,
    /// Signal-to-noise ratio in dB.
    pub snr: i32,
    /// Time offset in seconds.
    pub time_offset_sec: f64,
    /// Audio offset in Hz.
    pub audio_offset_hz: u32,
    /// Message text, trimmed and non-empty.
    pub message: String,
    /// First call-sign candidate in the message.
    pub call_a: Option<CallSign>,
    /// Second call-sign candidate in the message.
    pub call_b: Option<CallSign>,
}

impl TransmissionRecord {
    /// Returns true when this record names both `x` and `y` as its call pair,
    /// in either order.
    pub fn is_between(&self, x: &str, y: &str) -> bool {
        let a = self.call_a.as_deref();
        let b = self.call_b.as_deref();
        (a == Some(x) && b == Some(y)) || (a == Some(y) && b == Some(x))
    }

    /// The other party of a record involving `operator`, if any.
    ///
    /// Mirrors the stored peer query: when `call_a` is the operator the peer is
    /// `call_b`, otherwise it is `call_a`.
    pub fn peer_of(&self, operator: &str) -> Option<&str> {
        let a = self.call_a.as_deref();
        let b = self.call_b.as_deref();
        if a != Some(operator) && b != Some(operator) {
            return None;
        }
        if a == Some(operator) { b } else { a }
    }
}

/// Parses a `YYMMDD_HHMMSS` token as UTC.
pub fn parse_log_timestamp(token: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(token, LOG_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Formats a timestamp for the `timestamp` column.
pub fn format_stored_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(STORED_TIMESTAMP_FORMAT).to_string()
}

/// Parses a `timestamp` column value.
pub fn parse_stored_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, STORED_TIMESTAMP_FORMAT).map(|naive| naive.and_utc())
}
