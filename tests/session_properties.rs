use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use proptest::prelude::*;

use ft8qso::{
    config::{BandPlan, StationConfig},
    record::TransmissionRecord,
    session::{
        SessionReconstructor, dominant_frequency, is_signal_token, signal_tokens, split_by_gap,
    },
    types::{Direction, UNKNOWN_BAND},
};

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

fn rec(offset_secs: i64, freq: f64, msg: &str) -> TransmissionRecord {
    TransmissionRecord {
        timestamp: base() + TimeDelta::seconds(offset_secs),
        frequency_mhz: freq,
        direction: Direction::Rx,
        snr: -10,
        time_offset_sec: 0.1,
        audio_offset_hz: 1500,
        message: msg.to_string(),
        call_a: Some("N1ZZT".to_string()),
        call_b: Some("W2ABC".to_string()),
    }
}

#[test]
fn gap_of_exactly_threshold_stays_in_session() {
    let r = SessionReconstructor::default();
    let sessions = r.reconstruct(
        "W2ABC",
        vec![rec(0, 14.074, "a"), rec(60, 14.074, "b"), rec(121, 14.074, "c")],
    );
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].records.len(), 2);
    assert_eq!(sessions[0].start_time, base());
    assert_eq!(sessions[0].end_time, base() + TimeDelta::seconds(60));
    assert_eq!(sessions[0].duration(), TimeDelta::seconds(60));
    assert_eq!(sessions[1].duration(), TimeDelta::zero());
    assert_eq!(sessions[1].records.len(), 1);
}

#[test]
fn gap_threshold_comes_from_station_config() {
    let station = StationConfig {
        session_gap_secs: 300,
        ..StationConfig::default()
    };
    let r = SessionReconstructor::new(&station, BandPlan::default());
    let sessions = r.reconstruct("W2ABC", vec![rec(0, 14.074, "a"), rec(240, 14.074, "b")]);
    assert_eq!(sessions.len(), 1);
}

#[test]
fn empty_input_yields_no_sessions() {
    assert!(SessionReconstructor::default().reconstruct("W2ABC", Vec::new()).is_empty());
}

#[test]
fn dominant_frequency_prefers_count_then_lowest() {
    let most = [rec(0, 7.074, "a"), rec(1, 14.074, "b"), rec(2, 14.0741, "c")];
    assert_eq!(dominant_frequency(&most), Some(14.074));

    let tie = [rec(0, 14.074, "a"), rec(1, 7.074, "b")];
    assert_eq!(dominant_frequency(&tie), Some(7.074));

    assert_eq!(dominant_frequency(&[]), None);
}

#[test]
fn session_band_follows_dominant_frequency() {
    let r = SessionReconstructor::default();
    let s = &r.reconstruct("W2ABC", vec![rec(0, 3.573, "a"), rec(10, 3.573, "b")])[0];
    assert_eq!(s.band, "80m");
    assert_eq!(s.frequency_mhz, 3.573);

    let odd = &r.reconstruct("W2ABC", vec![rec(0, 11.0, "a")])[0];
    assert_eq!(odd.band, UNKNOWN_BAND);
    assert!(odd.is_unknown_band());
}

#[test]
fn signal_token_golden_cases() {
    let kept = ["RR73", "R73", "73", "-08", "+05", "R-05", "R+12", "RRR", "ROGER", "1500", "--3"];
    for t in kept {
        assert!(is_signal_token(t), "dropped {t}");
    }
    let dropped = ["N1ZZT", "W2ABC", "FN31", "CQ", "-", "+", "", "TU", "5NN"];
    for t in dropped {
        assert!(!is_signal_token(t), "kept {t}");
    }

    assert_eq!(
        signal_tokens(["CQ N1ZZT FN31", "N1ZZT W2ABC -08", "W2ABC N1ZZT R-05", "N1ZZT W2ABC RR73"]),
        vec!["-08", "R-05", "RR73"]
    );
}

#[test]
fn band_plan_edges_are_inclusive() {
    let plan = BandPlan::default();
    assert_eq!(plan.band_for(14.0), "20m");
    assert_eq!(plan.band_for(14.35), "20m");
    assert_eq!(plan.band_for(14.351), UNKNOWN_BAND);
    assert_eq!(plan.band_for(1.8), "160m");
    assert_eq!(plan.band_for(148.0), "2m");
    assert_eq!(plan.band_for(f64::NAN), UNKNOWN_BAND);
}

proptest! {
    #[test]
    fn reconstruct_partitions_input_in_order(steps in prop::collection::vec(0i64..200, 0..120)) {
        let mut t = 0i64;
        let records: Vec<TransmissionRecord> = steps
            .iter()
            .enumerate()
            .map(|(i, step)| {
                t += step;
                rec(t, 14.074, &format!("MSG{i}"))
            })
            .collect();

        let r = SessionReconstructor::default();
        let sessions = r.reconstruct("W2ABC", records.clone());

        let flattened: Vec<TransmissionRecord> =
            sessions.iter().flat_map(|s| s.records.iter().cloned()).collect();
        prop_assert_eq!(&flattened, &records);

        let limit = TimeDelta::seconds(60);
        for s in &sessions {
            prop_assert!(!s.records.is_empty());
            prop_assert_eq!(s.start_time, s.records[0].timestamp);
            prop_assert_eq!(s.end_time, s.records[s.records.len() - 1].timestamp);
            for w in s.records.windows(2) {
                prop_assert!(w[1].timestamp - w[0].timestamp <= limit);
            }
        }
        for w in sessions.windows(2) {
            let last = &w[0].records[w[0].records.len() - 1];
            prop_assert!(w[1].start_time - last.timestamp > limit);
        }
    }

    #[test]
    fn split_by_gap_session_count_matches_large_gaps(steps in prop::collection::vec(0i64..120, 1..80)) {
        let mut t = 0i64;
        let stamps: Vec<DateTime<Utc>> = steps
            .iter()
            .map(|s| {
                t += s;
                base() + TimeDelta::seconds(t)
            })
            .collect();
        let large_gaps = steps.iter().skip(1).filter(|s| **s > 60).count();

        let groups = split_by_gap(stamps, TimeDelta::seconds(60), |ts| *ts);
        prop_assert_eq!(groups.len(), large_gaps + 1);
    }

    #[test]
    fn band_mapping_is_total(freq in prop::num::f64::ANY) {
        let plan = BandPlan::default();
        let band = plan.band_for(freq);
        let matching = plan
            .ranges
            .iter()
            .filter(|r| r.low_mhz <= freq && freq <= r.high_mhz)
            .count();
        if matching == 0 {
            prop_assert_eq!(band, UNKNOWN_BAND);
        } else {
            prop_assert_eq!(matching, 1);
            prop_assert_ne!(band, UNKNOWN_BAND);
        }
    }
}
