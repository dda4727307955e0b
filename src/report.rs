//! Plain-text renderings of reconstructed sessions.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::session::{Session, is_low_interest};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn fmt_time(ts: &DateTime<Utc>) -> String {
    ts.format(TIME_FORMAT).to_string()
}

fn tokens_or(session: &Session, empty: &str) -> String {
    if session.signal_tokens.is_empty() {
        empty.to_string()
    } else {
        session.signal_tokens.join(" ")
    }
}

/// Numbered report of every session with `target_call`.
pub fn render_target_report(sessions: &[Session], target_call: &str) -> String {
    let mut out = String::new();
    if sessions.is_empty() {
        let _ = writeln!(out, "No QSOs found with {target_call}.");
        return out;
    }

    let _ = writeln!(out, "\nFound {} QSO(s) with {target_call}:\n", sessions.len());
    for (i, s) in sessions.iter().enumerate() {
        let _ = writeln!(out, "QSO #{}", i + 1);
        let _ = writeln!(out, "  Start Time (UTC): {}", fmt_time(&s.start_time));
        let _ = writeln!(out, "  End Time (UTC):   {}", fmt_time(&s.end_time));
        let _ = writeln!(out, "  Duration: {}s", s.duration().num_seconds());
        let _ = writeln!(out, "  Frequency: {:.3} MHz", s.frequency_mhz);
        let _ = writeln!(out, "  Band: {}", s.band);
        let _ = writeln!(out, "  Signal Reports / QSO Terms: {}", tokens_or(s, "(none found)"));
        let _ = writeln!(out);
    }
    out
}

/// One line per session.
pub fn render_summary_line(s: &Session) -> String {
    format!(
        "QSO with {:<8} | Band: {:<4} | Freq: {:.3} MHz | Start: {} | End: {} | Reports: {}",
        s.peer_call,
        s.band,
        s.frequency_mhz,
        fmt_time(&s.start_time),
        fmt_time(&s.end_time),
        tokens_or(s, "-"),
    )
}

/// Summary lines for a merged all-peers listing.
pub fn render_all(sessions: &[Session]) -> String {
    let mut out = String::new();
    for s in sessions {
        let _ = writeln!(out, "{}", render_summary_line(s));
    }
    out
}

/// Member lines of one session. CQ calls and self-announcements with `grid`
/// are prefixed with `.` instead of a space.
pub fn render_detail(session: &Session, grid: &str) -> String {
    let mut out = String::new();
    for rec in &session.records {
        let marker = if is_low_interest(rec, grid) { '.' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker} [{}] {} {:.3} MHz {:>4} dB | {}",
            fmt_time(&rec.timestamp),
            rec.direction,
            rec.frequency_mhz,
            rec.snr,
            rec.message
        );
    }
    out
}
