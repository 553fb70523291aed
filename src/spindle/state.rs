//! Bounded rolling state the Spindle Loop Detector accumulates per ticket.
//! Every collection here is capped so a runaway ticket
//! can't grow this struct without bound — the same discipline as
//! `coordination::escalation::state::EscalationState`'s windowed history.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::SpindleThresholds;
use crate::learnings::classify::FailureCategory;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpindleState {
    pub recent_outputs: Vec<String>,
    pub recent_diffs: Vec<String>,
    pub iterations_since_change: u32,
    pub estimated_tokens: u64,
    pub total_output_chars: u64,
    pub total_change_chars: u64,
    pub failing_command_signatures: Vec<String>,
    pub file_edit_counts: HashMap<String, u32>,
    pub qa_round_trips: u32,
    pub warnings: HashSet<String>,
    /// Category of each QA/verification failure seen so far, oldest first,
    /// bounded the same as `recent_diffs` — feeds the friction check.
    pub error_category_log: Vec<FailureCategory>,
    /// Error count observed at each iteration, oldest first, bounded the
    /// same as `recent_diffs` — feeds the convergence signal.
    pub error_count_log: Vec<u32>,
}

impl SpindleState {
    pub fn record_output(&mut self, output: &str, thresholds: &SpindleThresholds) {
        self.total_output_chars += output.len() as u64;
        self.estimated_tokens += estimate_tokens(output);
        self.recent_outputs.push(output.to_string());
        let cap = thresholds.max_similar_outputs + 1;
        if self.recent_outputs.len() > cap {
            let overflow = self.recent_outputs.len() - cap;
            self.recent_outputs.drain(0..overflow);
        }
    }

    pub fn record_diff(&mut self, diff: &str, thresholds: &SpindleThresholds) {
        self.total_change_chars += diff.len() as u64;
        self.recent_diffs.push(diff.to_string());
        if self.recent_diffs.len() > thresholds.max_recent_diffs {
            let overflow = self.recent_diffs.len() - thresholds.max_recent_diffs;
            self.recent_diffs.drain(0..overflow);
        }
        if diff.trim().is_empty() {
            self.iterations_since_change += 1;
        } else {
            self.iterations_since_change = 0;
        }
    }

    pub fn record_command_failure(&mut self, signature: String, thresholds: &SpindleThresholds) {
        self.failing_command_signatures.push(signature);
        if self.failing_command_signatures.len() > thresholds.max_command_signatures {
            let overflow = self.failing_command_signatures.len() - thresholds.max_command_signatures;
            self.failing_command_signatures.drain(0..overflow);
        }
    }

    pub fn record_file_edit(&mut self, path: &str, thresholds: &SpindleThresholds) {
        *self.file_edit_counts.entry(path.to_string()).or_insert(0) += 1;
        if self.file_edit_counts.len() > thresholds.max_tracked_files {
            // Prune the least-edited entries first, keeping the files under
            // most active churn (those are what file-churn detection cares about).
            let mut entries: Vec<(String, u32)> =
                self.file_edit_counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
            entries.sort_by_key(|(_, count)| *count);
            let overflow = self.file_edit_counts.len() - thresholds.max_tracked_files;
            for (path, _) in entries.into_iter().take(overflow) {
                self.file_edit_counts.remove(&path);
            }
        }
    }

    pub fn record_qa_round_trip(&mut self) {
        self.qa_round_trips += 1;
    }

    /// Record this iteration's failure category (friction detection).
    pub fn record_error_category(&mut self, category: FailureCategory, thresholds: &SpindleThresholds) {
        self.error_category_log.push(category);
        if self.error_category_log.len() > thresholds.max_recent_diffs {
            let overflow = self.error_category_log.len() - thresholds.max_recent_diffs;
            self.error_category_log.drain(0..overflow);
        }
    }

    /// Record this iteration's error count (convergence/delight signal).
    pub fn record_error_count(&mut self, count: u32, thresholds: &SpindleThresholds) {
        self.error_count_log.push(count);
        if self.error_count_log.len() > thresholds.max_recent_diffs {
            let overflow = self.error_count_log.len() - thresholds.max_recent_diffs;
            self.error_count_log.drain(0..overflow);
        }
    }

    /// True if the error count has dropped for two iterations running — a
    /// non-blocking "converging" signal that softens other soft warnings.
    pub fn is_converging(&self) -> bool {
        let n = self.error_count_log.len();
        n >= 3
            && self.error_count_log[n - 1] < self.error_count_log[n - 2]
            && self.error_count_log[n - 2] < self.error_count_log[n - 3]
    }
}

/// Cheap token estimate: chars / 4, rounded up.
pub fn estimate_tokens(text: &str) -> u64 {
    ((text.len() as u64) + 3) / 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_outputs_stays_bounded() {
        let thresholds = SpindleThresholds::default();
        let mut state = SpindleState::default();
        for i in 0..20 {
            state.record_output(&format!("output {i}"), &thresholds);
        }
        assert!(state.recent_outputs.len() <= thresholds.max_similar_outputs + 1);
    }

    #[test]
    fn file_edit_counts_prunes_when_over_cap() {
        let mut thresholds = SpindleThresholds::default();
        thresholds.max_tracked_files = 3;
        let mut state = SpindleState::default();
        for i in 0..10 {
            state.record_file_edit(&format!("file{i}.rs"), &thresholds);
        }
        assert!(state.file_edit_counts.len() <= 3);
    }

    #[test]
    fn empty_diff_increments_stall_counter() {
        let thresholds = SpindleThresholds::default();
        let mut state = SpindleState::default();
        state.record_diff("", &thresholds);
        state.record_diff("   ", &thresholds);
        assert_eq!(state.iterations_since_change, 2);
        state.record_diff("+fn x() {}", &thresholds);
        assert_eq!(state.iterations_since_change, 0);
    }

    #[test]
    fn two_consecutive_drops_are_converging() {
        let thresholds = SpindleThresholds::default();
        let mut state = SpindleState::default();
        for count in [10, 6, 2] {
            state.record_error_count(count, &thresholds);
        }
        assert!(state.is_converging());
    }

    #[test]
    fn a_single_drop_is_not_enough_to_converge() {
        let thresholds = SpindleThresholds::default();
        let mut state = SpindleState::default();
        for count in [10, 6] {
            state.record_error_count(count, &thresholds);
        }
        assert!(!state.is_converging());
    }
}
