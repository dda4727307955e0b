//! QSO session reconstruction from one peer's chronological records.
//!
//! Records are clustered greedily: each record joins the open session when it
//! follows the previous record by at most the configured gap, and starts a new
//! session otherwise. One linear pass, stable, deterministic.

use chrono::{DateTime, TimeDelta, Utc};
use hashbrown::HashMap;
use serde::Serialize;

use crate::{
    config::{BandPlan, StationConfig},
    record::TransmissionRecord,
    types::{CallSign, UNKNOWN_BAND},
};

/// Tokens that close a QSO.
pub const QSO_TERMS: [&str; 3] = ["RR73", "R73", "73"];

/// A reconstructed conversation between the operator and one peer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    /// The other station.
    pub peer_call: CallSign,
    /// Timestamp of the first member.
    pub start_time: DateTime<Utc>,
    /// Timestamp of the last member.
    pub end_time: DateTime<Utc>,
    /// Band of [`Session::frequency_mhz`], or [`UNKNOWN_BAND`].
    pub band: String,
    /// Most common member frequency, rounded to kHz.
    pub frequency_mhz: f64,
    /// Members, oldest first.
    pub records: Vec<TransmissionRecord>,
    /// Report and closing tokens, in message order.
    pub signal_tokens: Vec<String>,
}

impl Session {
    /// Builds a session from non-empty ordered members.
    fn from_records(peer: &str, records: Vec<TransmissionRecord>, bands: &BandPlan) -> Option<Self> {
        let start_time = records.first()?.timestamp;
        let end_time = records.last()?.timestamp;
        let frequency_mhz = dominant_frequency(&records)?;
        let band = bands.band_for(frequency_mhz).to_string();
        let signal_tokens = signal_tokens(records.iter().map(|r| r.message.as_str()));

        Some(Self {
            peer_call: peer.to_string(),
            start_time,
            end_time,
            band,
            frequency_mhz,
            records,
            signal_tokens,
        })
    }

    /// Wall-clock span from first to last member.
    pub fn duration(&self) -> TimeDelta {
        self.end_time - self.start_time
    }

    /// True when the band could not be determined.
    pub fn is_unknown_band(&self) -> bool {
        self.band == UNKNOWN_BAND
    }
}

/// True for CQ calls and for messages that end with the operator's own grid.
///
/// Detail views dim these.
pub fn is_low_interest(rec: &TransmissionRecord, grid: &str) -> bool {
    rec.message.starts_with("CQ") || (!grid.is_empty() && rec.message.ends_with(grid))
}

/// Loose report/closing-term test.
///
/// Keeps [`QSO_TERMS`], anything starting with `R` (so `ROGER` and `RRR` too),
/// and anything that is all ASCII digits once leading `+`/`-` are stripped (so
/// plain numbers such as `1500` too).
pub fn is_signal_token(token: &str) -> bool {
    if QSO_TERMS.contains(&token) || token.starts_with('R') {
        return true;
    }
    let digits = token.trim_start_matches(['+', '-']);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Signal tokens across `messages`, in order.
pub fn signal_tokens<'a>(messages: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    messages
        .into_iter()
        .flat_map(str::split_whitespace)
        .filter(|t| is_signal_token(t))
        .map(str::to_string)
        .collect()
}

fn khz_key(freq_mhz: f64) -> i64 {
    (freq_mhz * 1000.0).round() as i64
}

/// Most frequent member frequency after rounding to three decimals.
///
/// Ties go to the lowest frequency. `None` for an empty slice.
pub fn dominant_frequency(records: &[TransmissionRecord]) -> Option<f64> {
    let mut counts: HashMap<i64, usize> = HashMap::new();
    for rec in records {
        *counts.entry(khz_key(rec.frequency_mhz)).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by(|(fa, ca), (fb, cb)| ca.cmp(cb).then(fb.cmp(fa)))
        .map(|(khz, _)| khz as f64 / 1000.0)
}

/// Partitions ordered `items` wherever consecutive timestamps are more than
/// `gap` apart.
pub fn split_by_gap<T>(
    items: Vec<T>,
    gap: TimeDelta,
    timestamp: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<Vec<T>> {
    let mut out = Vec::new();
    let mut current: Vec<T> = Vec::new();
    let mut prev: Option<DateTime<Utc>> = None;

    for item in items {
        let ts = timestamp(&item);
        let joins = current.is_empty() || prev.is_some_and(|p| ts - p <= gap);
        if !joins {
            out.push(std::mem::take(&mut current));
        }
        current.push(item);
        prev = Some(ts);
    }

    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Splits one peer's records into sessions and derives band, frequency and tokens.
#[derive(Debug, Clone)]
pub struct SessionReconstructor {
    gap: TimeDelta,
    bands: BandPlan,
}

impl SessionReconstructor {
    /// Uses the station's session gap and the given band plan.
    pub fn new(station: &StationConfig, bands: BandPlan) -> Self {
        let gap = TimeDelta::try_seconds(station.session_gap_secs).unwrap_or(TimeDelta::MAX);
        Self { gap, bands }
    }

    /// Sessions for `peer`, in start-time order. `records` must be oldest first.
    pub fn reconstruct(&self, peer: &str, records: Vec<TransmissionRecord>) -> Vec<Session> {
        split_by_gap(records, self.gap, |r| r.timestamp)
            .into_iter()
            .filter_map(|members| Session::from_records(peer, members, &self.bands))
            .collect()
    }
}

impl Default for SessionReconstructor {
    fn default() -> Self {
        Self::new(&StationConfig::default(), BandPlan::default())
    }
}
