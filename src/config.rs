//! Typed configuration structs handed in by the embedding caller.
//!
//! YAML/JSON config parsing is an external collaborator — this
//! crate never touches `config.yaml` itself. It owns the typed shape of the
//! knobs it reads, with documented defaults, the way
//! `crates/swarm-agents/src/config.rs`'s `SwarmConfig` owns typed defaults
//! for the swarm it drives. Because this crate doesn't own process
//! environment access either, overrides are applied via a builder instead
//! of `std::env::var` calls.

use serde::{Deserialize, Serialize};

/// How a session picks up and drives tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    Auto,
    Planning,
    Spin,
    Wheel,
}

/// How a finished ticket's changes reach the target repo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    Direct,
    Pr,
    AutoMerge,
}

impl DeliveryMode {
    /// Whether the PR cap applies to this delivery mode.
    pub fn pr_cap_applies(self) -> bool {
        !matches!(self, DeliveryMode::Direct)
    }
}

/// Top-level session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub run_mode: RunMode,
    pub delivery_mode: DeliveryMode,
    pub milestone_mode: bool,
    pub max_prs: u32,
    pub step_budget: u64,
    pub max_cycles: u32,
    pub batch_size: Option<u32>,
    pub parallel_limit: u8,
    /// Max lines per ticket absent adaptive trust adjustment.
    pub max_lines_per_ticket: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            run_mode: RunMode::Auto,
            delivery_mode: DeliveryMode::Pr,
            milestone_mode: false,
            max_prs: 5,
            step_budget: 5_000,
            max_cycles: 50,
            batch_size: None,
            parallel_limit: 2,
            max_lines_per_ticket: 400,
        }
    }
}

impl SessionConfig {
    /// Clamp `parallel_limit` into the supported `[1, 5]` range.
    pub fn clamped_parallel_limit(&self) -> u8 {
        self.parallel_limit.clamp(1, 5)
    }
}

/// Spindle detector thresholds. Defaults are fixed, reproducible constants
/// so behavior doesn't depend on a config file being present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpindleThresholds {
    pub token_budget_abort: u64,
    pub token_budget_warning: u64,
    pub max_stall_iterations: u32,
    pub oscillation_similarity: f64,
    pub max_similar_outputs: usize,
    pub repetition_similarity: f64,
    pub verbosity_char_floor: usize,
    pub verbosity_ratio: f64,
    pub max_qa_ping_pong: u32,
    pub max_command_failures: u32,
    pub max_file_edits: u32,
    pub max_tracked_files: usize,
    pub max_recent_diffs: usize,
    pub max_command_signatures: usize,
}

impl Default for SpindleThresholds {
    fn default() -> Self {
        Self {
            token_budget_abort: 140_000,
            token_budget_warning: 100_000,
            max_stall_iterations: 5,
            oscillation_similarity: 0.8,
            max_similar_outputs: 3,
            repetition_similarity: 0.8,
            verbosity_char_floor: 5_000,
            verbosity_ratio: 10.0,
            max_qa_ping_pong: 3,
            max_command_failures: 3,
            max_file_edits: 3,
            max_tracked_files: 50,
            max_recent_diffs: 5,
            max_command_signatures: 20,
        }
    }
}

/// Scope policy defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeDefaults {
    pub max_files: usize,
    pub max_lines_test: u32,
    pub dedup_similarity_threshold: f64,
}

impl Default for ScopeDefaults {
    fn default() -> Self {
        Self {
            max_files: 10,
            max_lines_test: 1_000,
            // Dedup threshold is a single session-level config, not a
            // per-call-site constant.
            dedup_similarity_threshold: 0.6,
        }
    }
}

/// Retention limits. All bounds are "keep newest N".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionLimits {
    pub run_folders: usize,
    pub history_lines: usize,
    pub metrics_lines: usize,
    pub artifacts_per_run: usize,
    pub spool_archives: usize,
    pub deferred_proposals: usize,
    pub log_max_bytes: u64,
    pub artifact_max_age_days: u32,
}

impl Default for RetentionLimits {
    fn default() -> Self {
        Self {
            run_folders: 50,
            history_lines: 2_000,
            metrics_lines: 2_000,
            artifacts_per_run: 200,
            spool_archives: 20,
            deferred_proposals: 100,
            log_max_bytes: 10 * 1024 * 1024,
            artifact_max_age_days: 30,
        }
    }
}

/// Wave scheduler conflict sensitivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictSensitivity {
    Relaxed,
    Normal,
    Strict,
}

/// Escalation/critic tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationTuning {
    pub decay_rate_per_run: f64,
    pub low_risk_threshold: u32,
    pub medium_risk_threshold: u32,
    pub suppress_critic_confidence_floor: u8,
}

impl Default for EscalationTuning {
    fn default() -> Self {
        Self {
            decay_rate_per_run: 0.05,
            low_risk_threshold: 30,
            medium_risk_threshold: 60,
            suppress_critic_confidence_floor: 50,
        }
    }
}

/// Aggregate configuration bundle threaded through the core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoreConfig {
    pub session: SessionConfig,
    pub spindle: SpindleThresholds,
    pub scope: ScopeDefaults,
    pub retention: RetentionLimits,
    pub escalation: EscalationTuning,
}

impl CoreConfig {
    /// Builder-style override, since this crate does not read env vars itself.
    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }
}
