//! Log line parser and call-sign heuristic.
//!
//! Accepted line shape, whitespace separated:
//!
//! ```text
//! <YYMMDD_HHMMSS> <freqMHz> <Rx|Tx> <mode> <snr> <deltaSec> <audioHz> <message...>
//! ```
//!
//! Anything else is rejected with `None`; rejection is not an error.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    config::ParserConfig,
    record::{TransmissionRecord, parse_log_timestamp},
    types::{CallSign, Direction},
};

static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{6}_\d{6})\s+([\d.]+)\s+(Rx|Tx)\s+(\S+)\s+([-+]?\d+)\s+([-+]?\d+\.\d+)\s+(\d+)\s+(.*)$",
    )
    .expect("line pattern")
});

/// Parser accepting lines for one protocol-mode tag.
#[derive(Debug, Clone)]
pub struct LineParser {
    mode_tag: String,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new(&ParserConfig::default())
    }
}

impl LineParser {
    /// Builds a parser accepting lines tagged with `cfg.mode_tag`.
    pub fn new(cfg: &ParserConfig) -> Self {
        Self {
            mode_tag: cfg.mode_tag.trim().to_string(),
        }
    }

    /// Parses one raw line, with or without its trailing newline.
    pub fn parse(&self, raw_line: &str) -> Option<TransmissionRecord> {
        let line = raw_line.trim_end_matches(['\n', '\r']);
        let caps = LINE_PATTERN.captures(line)?;
        if &caps[4] != self.mode_tag.as_str() {
            return None;
        }

        let timestamp = parse_log_timestamp(&caps[1])?;
        let frequency_mhz: f64 = caps[2].parse().ok()?;
        let direction = Direction::from_token(&caps[3])?;
        let snr: i32 = caps[5].parse().ok()?;
        let time_offset_sec: f64 = caps[6].parse().ok()?;
        let audio_offset_hz: u32 = caps[7].parse().ok()?;

        let message = caps[8].trim();
        if message.is_empty() {
            return None;
        }
        let (call_a, call_b) = extract_calls(message);

        Some(TransmissionRecord {
            timestamp,
            frequency_mhz,
            direction,
            snr,
            time_offset_sec,
            audio_offset_hz,
            message: message.to_string(),
            call_a,
            call_b,
        })
    }
}

/// Returns true for tokens of at least three uppercase ASCII letters or digits
/// that are not purely numeric.
///
/// Grid squares (`FN31`) and some report-like tokens (`RR73`) also qualify;
/// callers depend on that, so it stays.
pub fn is_call_candidate(token: &str) -> bool {
    token.len() >= 3
        && token
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        && !token.bytes().all(|b| b.is_ascii_digit())
}

/// The first two call-sign candidates of `message`, in message order.
pub fn extract_calls(message: &str) -> (Option<CallSign>, Option<CallSign>) {
    let mut calls = message
        .split_whitespace()
        .filter(|t| is_call_candidate(t))
        .map(str::to_string);
    let first = calls.next();
    let second = calls.next();
    (first, second)
}
