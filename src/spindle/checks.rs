//! The Spindle Loop Detector's ordered checks.
//!
//! Run in a fixed priority order — token budget first, file-churn last —
//! and the first check that fires wins; later checks are skipped once one
//! has produced a verdict. This mirrors the short-circuit shape of
//! `coordination::reviewer_policy`'s staged pipeline, generalized from
//! "verifier gates block AST analysis" to "token exhaustion blocks every
//! softer signal".

use std::collections::HashSet;

use sha2::{Digest, Sha256};

use crate::config::SpindleThresholds;

use super::state::SpindleState;

#[derive(Debug, Clone, PartialEq)]
pub struct SpindleVerdict {
    pub should_abort: bool,
    pub should_block: bool,
    pub reason: String,
    pub confidence: f64,
    pub diagnostics: Vec<String>,
}

impl SpindleVerdict {
    fn clean() -> Self {
        Self {
            should_abort: false,
            should_block: false,
            reason: String::new(),
            confidence: 0.0,
            diagnostics: Vec::new(),
        }
    }

    fn abort(reason: impl Into<String>, confidence: f64, diagnostics: Vec<String>) -> Self {
        Self {
            should_abort: true,
            should_block: false,
            reason: reason.into(),
            confidence,
            diagnostics,
        }
    }

    fn block(reason: impl Into<String>, confidence: f64, diagnostics: Vec<String>) -> Self {
        Self {
            should_abort: false,
            should_block: true,
            reason: reason.into(),
            confidence,
            diagnostics,
        }
    }

    fn warn(reason: impl Into<String>, confidence: f64, diagnostics: Vec<String>) -> Self {
        Self {
            should_abort: false,
            should_block: false,
            reason: reason.into(),
            confidence,
            diagnostics,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.reason.is_empty() && !self.should_abort && !self.should_block
    }
}

/// Run the checks in a fixed priority order, returning the first
/// non-clean verdict. Returns `SpindleVerdict::clean()` if nothing fires.
///
/// Two additional signals run after the ordered checks, neither gated by
/// priority order since neither can itself abort or block: a converging
/// error count (two consecutive drops) suppresses a soft warn-level
/// verdict — the ticket is making real progress even if a softer signal
/// fired — and category-level friction (an oscillating or plateauing
/// failure category across iterations) is appended as a diagnostic on
/// whatever verdict comes out, clean or not.
pub fn evaluate(state: &SpindleState, thresholds: &SpindleThresholds) -> SpindleVerdict {
    let checks: [fn(&SpindleState, &SpindleThresholds) -> SpindleVerdict; 8] = [
        check_token_budget,
        check_stalling,
        check_oscillation,
        check_repetition,
        check_verbosity,
        check_qa_ping_pong,
        check_command_signature_recurrence,
        check_file_churn,
    ];

    let mut verdict = SpindleVerdict::clean();
    for check in checks {
        let candidate = check(state, thresholds);
        if !candidate.is_clean() {
            verdict = candidate;
            break;
        }
    }

    if !verdict.should_abort && !verdict.should_block && !verdict.reason.is_empty() && state.is_converging() {
        verdict = SpindleVerdict::clean();
    }

    verdict.diagnostics.extend(category_friction_diagnostics(state));
    verdict
}

/// Map a verdict onto the coarse risk level the state-query digest reports
/// as `Digest.spindle_risk`. A converging ticket never reaches
/// this function at `should_abort`/`should_block` severity since `evaluate`
/// already suppressed the soft warn that would have produced it.
pub fn spindle_risk(verdict: &SpindleVerdict) -> crate::events::SpindleRisk {
    use crate::events::SpindleRisk;
    if verdict.is_clean() {
        SpindleRisk::None
    } else if verdict.confidence >= 0.8 {
        SpindleRisk::High
    } else if verdict.confidence >= 0.5 {
        SpindleRisk::Medium
    } else {
        SpindleRisk::Low
    }
}

/// Non-blocking category-level friction: the failure category oscillating
/// back and forth, or plateauing on the same category run after run,
/// distinct from the diff-line oscillation check above.
fn category_friction_diagnostics(state: &SpindleState) -> Vec<String> {
    let log = &state.error_category_log;
    if log.len() < 3 {
        return Vec::new();
    }
    let last = log[log.len() - 1];
    let prev = log[log.len() - 2];
    if log[log.len() - 3] == last && prev != last {
        return vec![format!("error category oscillating between {last} and {prev}")];
    }
    let plateau = log.iter().rev().take_while(|c| **c == last).count();
    if plateau >= 3 {
        return vec![format!("error category {last} plateauing across {plateau} iterations")];
    }
    Vec::new()
}

fn check_token_budget(state: &SpindleState, thresholds: &SpindleThresholds) -> SpindleVerdict {
    if state.estimated_tokens >= thresholds.token_budget_abort {
        return SpindleVerdict::abort(
            "estimated token usage exceeded abort threshold",
            1.0,
            vec![format!(
                "estimated_tokens={} abort_at={}",
                state.estimated_tokens, thresholds.token_budget_abort
            )],
        );
    }
    if state.estimated_tokens >= thresholds.token_budget_warning {
        return SpindleVerdict::warn(
            "estimated token usage approaching abort threshold",
            0.5,
            vec![format!(
                "estimated_tokens={} warning_at={}",
                state.estimated_tokens, thresholds.token_budget_warning
            )],
        );
    }
    SpindleVerdict::clean()
}

fn check_stalling(state: &SpindleState, thresholds: &SpindleThresholds) -> SpindleVerdict {
    if state.iterations_since_change >= thresholds.max_stall_iterations {
        return SpindleVerdict::abort(
            "no diff produced for consecutive iterations",
            0.9,
            vec![format!("iterations_since_change={}", state.iterations_since_change)],
        );
    }
    SpindleVerdict::clean()
}

fn check_oscillation(state: &SpindleState, thresholds: &SpindleThresholds) -> SpindleVerdict {
    if state.recent_diffs.len() < 3 {
        return SpindleVerdict::clean();
    }
    let last = state.recent_diffs.last().unwrap();
    for earlier in state.recent_diffs[..state.recent_diffs.len() - 1].iter().rev().skip(1) {
        let sim = jaccard_similarity(last, earlier);
        if sim >= thresholds.oscillation_similarity {
            return SpindleVerdict::abort(
                "diff oscillating back to a prior state",
                sim,
                vec![format!("similarity={sim:.2}")],
            );
        }
    }
    SpindleVerdict::clean()
}

/// Stuck phrasing that shows up when an agent is circling rather than
/// making progress, checked case-insensitively against recent outputs.
const STUCK_PHRASES: &[&str] = &["let me try", "trying again", "another approach", "i apologize"];

fn stuck_phrase_recurrence(outputs: &[String]) -> usize {
    outputs
        .iter()
        .filter(|o| {
            let lower = o.to_lowercase();
            STUCK_PHRASES.iter().any(|phrase| lower.contains(phrase))
        })
        .count()
}

fn check_repetition(state: &SpindleState, thresholds: &SpindleThresholds) -> SpindleVerdict {
    if state.recent_outputs.len() > thresholds.max_similar_outputs {
        let window = &state.recent_outputs[state.recent_outputs.len() - thresholds.max_similar_outputs - 1..];
        let last = window.last().unwrap();
        let similar_count = window[..window.len() - 1]
            .iter()
            .filter(|o| jaccard_similarity(last, o) >= thresholds.repetition_similarity)
            .count();
        if similar_count >= thresholds.max_similar_outputs {
            return SpindleVerdict::abort(
                "agent output repeating near-identical content",
                0.75,
                vec![format!("similar_count={similar_count}")],
            );
        }
    }

    let stuck_count = stuck_phrase_recurrence(&state.recent_outputs);
    if stuck_count >= 2 {
        return SpindleVerdict::abort(
            "agent output recurring on stuck phrasing",
            0.85,
            vec![format!("stuck_phrase_outputs={stuck_count}")],
        );
    }

    SpindleVerdict::clean()
}

fn check_verbosity(state: &SpindleState, thresholds: &SpindleThresholds) -> SpindleVerdict {
    if state.total_output_chars < thresholds.verbosity_char_floor as u64 {
        return SpindleVerdict::clean();
    }
    if state.total_change_chars == 0 {
        return SpindleVerdict::warn(
            "large output volume with no corresponding diff",
            0.4,
            vec![format!("total_output_chars={}", state.total_output_chars)],
        );
    }
    let ratio = state.total_output_chars as f64 / state.total_change_chars as f64;
    if ratio >= thresholds.verbosity_ratio {
        return SpindleVerdict::warn(
            "output-to-change ratio far exceeds expected verbosity",
            0.4,
            vec![format!("ratio={ratio:.1}")],
        );
    }
    SpindleVerdict::clean()
}

fn check_qa_ping_pong(state: &SpindleState, thresholds: &SpindleThresholds) -> SpindleVerdict {
    if state.qa_round_trips >= thresholds.max_qa_ping_pong {
        return SpindleVerdict::block(
            "too many execute/qa round trips on this ticket",
            0.9,
            vec![format!("qa_round_trips={}", state.qa_round_trips)],
        );
    }
    SpindleVerdict::clean()
}

fn check_command_signature_recurrence(state: &SpindleState, thresholds: &SpindleThresholds) -> SpindleVerdict {
    let mut counts = std::collections::HashMap::new();
    for sig in &state.failing_command_signatures {
        *counts.entry(sig.as_str()).or_insert(0u32) += 1;
    }
    if let Some((sig, count)) = counts.into_iter().max_by_key(|(_, c)| *c) {
        if count >= thresholds.max_command_failures {
            return SpindleVerdict::block(
                "same command keeps failing with the same signature",
                0.8,
                vec![format!("signature={sig} count={count}")],
            );
        }
    }
    SpindleVerdict::clean()
}

fn check_file_churn(state: &SpindleState, thresholds: &SpindleThresholds) -> SpindleVerdict {
    if let Some((path, count)) = state.file_edit_counts.iter().max_by_key(|(_, c)| **c) {
        if *count >= thresholds.max_file_edits {
            return SpindleVerdict::warn(
                "single file edited repeatedly without resolution",
                0.35,
                vec![format!("file={path} edit_count={count}")],
            );
        }
    }
    SpindleVerdict::clean()
}

/// SHA-256 command signature, truncated to 12 hex chars.
pub fn command_signature(command: &str, error_tail: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(command.as_bytes());
    hasher.update(b"\0");
    hasher.update(error_tail.as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..6])
}

/// Symmetric Jaccard similarity over whitespace-tokenized word sets.
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let ta: HashSet<&str> = a.split_whitespace().collect();
    let tb: HashSet<&str> = b.split_whitespace().collect();
    if ta.is_empty() && tb.is_empty() {
        return 1.0;
    }
    let intersection = ta.intersection(&tb).count();
    let union = ta.union(&tb).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

mod hex {
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}
