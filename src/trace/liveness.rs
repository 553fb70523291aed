//! Liveness analysis: gaps between trace events, idle ratio, stall periods.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::parser::TraceLine;

const STALL_GAP_SECS: f64 = 10.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessReport {
    pub max_gap_secs: f64,
    pub idle_ratio: f64,
    pub stall_periods: Vec<StallPeriod>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StallPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub gap_secs: f64,
}

pub fn extract_timestamps(lines: &[TraceLine]) -> Vec<DateTime<Utc>> {
    lines
        .iter()
        .filter_map(|l| l.raw.get("timestamp").and_then(Value::as_str))
        .filter_map(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .collect()
}

/// Compute liveness over a chronologically ordered sequence of event
/// timestamps. Gaps over [`STALL_GAP_SECS`] count toward the idle ratio and
/// are reported as stall periods.
pub fn analyze_liveness(timestamps: &[DateTime<Utc>]) -> LivenessReport {
    if timestamps.len() < 2 {
        return LivenessReport {
            max_gap_secs: 0.0,
            idle_ratio: 0.0,
            stall_periods: Vec::new(),
        };
    }

    let total_secs = (timestamps[timestamps.len() - 1] - timestamps[0]).num_milliseconds() as f64 / 1000.0;
    let mut max_gap = 0.0f64;
    let mut idle_secs = 0.0f64;
    let mut stalls = Vec::new();

    for pair in timestamps.windows(2) {
        let gap = (pair[1] - pair[0]).num_milliseconds() as f64 / 1000.0;
        max_gap = max_gap.max(gap);
        if gap > STALL_GAP_SECS {
            idle_secs += gap;
            stalls.push(StallPeriod {
                start: pair[0],
                end: pair[1],
                gap_secs: gap,
            });
        }
    }

    let idle_ratio = if total_secs > 0.0 { (idle_secs / total_secs).min(1.0) } else { 0.0 };

    LivenessReport {
        max_gap_secs: max_gap,
        idle_ratio,
        stall_periods: stalls,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn no_gaps_means_zero_idle_ratio() {
        let timestamps = vec![ts(0), ts(1), ts(2), ts(3)];
        let report = analyze_liveness(&timestamps);
        assert_eq!(report.idle_ratio, 0.0);
        assert!(report.stall_periods.is_empty());
    }

    #[test]
    fn long_gap_is_reported_as_a_stall() {
        let timestamps = vec![ts(0), ts(5), ts(50)];
        let report = analyze_liveness(&timestamps);
        assert_eq!(report.stall_periods.len(), 1);
        assert!(report.idle_ratio > 0.0);
        assert_eq!(report.max_gap_secs, 45.0);
    }

    #[test]
    fn fewer_than_two_timestamps_is_trivially_live() {
        let report = analyze_liveness(&[ts(0)]);
        assert_eq!(report.idle_ratio, 0.0);
    }
}
