//! Typed event stream between the core and the external agent integration.
//!
//! Mirrors `coordination::events::types::EnsembleEvent`: one tagged enum,
//! exhaustively matched, every payload JSON-representable. Unknown events
//! (e.g. a newer agent sending a type this build doesn't know) are handled
//! at the deserialization boundary in `log.rs`, not here — the enum itself
//! stays exhaustive and closed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type SessionId = String;
pub type TicketId = String;
pub type RunId = String;

/// The event types the core publishes over the lifetime of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoreEvent {
    SessionStart {
        session_id: SessionId,
        run_id: RunId,
        timestamp: DateTime<Utc>,
    },
    AdvanceCalled {
        session_id: SessionId,
        step: u64,
        timestamp: DateTime<Utc>,
    },
    ScoutOutput {
        session_id: SessionId,
        proposal_count: usize,
        timestamp: DateTime<Utc>,
    },
    ProposalsReviewed {
        session_id: SessionId,
        accepted: usize,
        dropped: usize,
        timestamp: DateTime<Utc>,
    },
    TicketAssigned {
        ticket_id: TicketId,
        wave_index: u32,
        timestamp: DateTime<Utc>,
    },
    PlanSubmitted {
        ticket_id: TicketId,
        risk_level: String,
        timestamp: DateTime<Utc>,
    },
    TicketResult {
        ticket_id: TicketId,
        success: bool,
        pr_url: Option<String>,
        timestamp: DateTime<Utc>,
    },
    QaCommandResult {
        ticket_id: TicketId,
        command: String,
        passed: bool,
        timestamp: DateTime<Utc>,
    },
    QaPassed {
        ticket_id: TicketId,
        timestamp: DateTime<Utc>,
    },
    QaFailed {
        ticket_id: TicketId,
        error_signature: String,
        timestamp: DateTime<Utc>,
    },
    PrCreated {
        ticket_id: TicketId,
        url: String,
        timestamp: DateTime<Utc>,
    },
    BudgetWarning {
        session_id: SessionId,
        detail: String,
        timestamp: DateTime<Utc>,
    },
    BudgetExhausted {
        session_id: SessionId,
        timestamp: DateTime<Utc>,
    },
    SpindleWarning {
        ticket_id: TicketId,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    SpindleAbort {
        ticket_id: TicketId,
        reason: String,
        confidence: f64,
        timestamp: DateTime<Utc>,
    },
    TicketCompleted {
        ticket_id: TicketId,
        timestamp: DateTime<Utc>,
    },
    TicketFailed {
        ticket_id: TicketId,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    UserOverride {
        session_id: SessionId,
        flag: String,
        timestamp: DateTime<Utc>,
    },
    HintConsumed {
        ticket_id: TicketId,
        hint: String,
        timestamp: DateTime<Utc>,
    },
    SessionEnd {
        session_id: SessionId,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

impl CoreEvent {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            CoreEvent::SessionStart { timestamp, .. }
            | CoreEvent::AdvanceCalled { timestamp, .. }
            | CoreEvent::ScoutOutput { timestamp, .. }
            | CoreEvent::ProposalsReviewed { timestamp, .. }
            | CoreEvent::TicketAssigned { timestamp, .. }
            | CoreEvent::PlanSubmitted { timestamp, .. }
            | CoreEvent::TicketResult { timestamp, .. }
            | CoreEvent::QaCommandResult { timestamp, .. }
            | CoreEvent::QaPassed { timestamp, .. }
            | CoreEvent::QaFailed { timestamp, .. }
            | CoreEvent::PrCreated { timestamp, .. }
            | CoreEvent::BudgetWarning { timestamp, .. }
            | CoreEvent::BudgetExhausted { timestamp, .. }
            | CoreEvent::SpindleWarning { timestamp, .. }
            | CoreEvent::SpindleAbort { timestamp, .. }
            | CoreEvent::TicketCompleted { timestamp, .. }
            | CoreEvent::TicketFailed { timestamp, .. }
            | CoreEvent::UserOverride { timestamp, .. }
            | CoreEvent::HintConsumed { timestamp, .. }
            | CoreEvent::SessionEnd { timestamp, .. } => *timestamp,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            CoreEvent::SessionStart { .. } => "session_start",
            CoreEvent::AdvanceCalled { .. } => "advance_called",
            CoreEvent::ScoutOutput { .. } => "scout_output",
            CoreEvent::ProposalsReviewed { .. } => "proposals_reviewed",
            CoreEvent::TicketAssigned { .. } => "ticket_assigned",
            CoreEvent::PlanSubmitted { .. } => "plan_submitted",
            CoreEvent::TicketResult { .. } => "ticket_result",
            CoreEvent::QaCommandResult { .. } => "qa_command_result",
            CoreEvent::QaPassed { .. } => "qa_passed",
            CoreEvent::QaFailed { .. } => "qa_failed",
            CoreEvent::PrCreated { .. } => "pr_created",
            CoreEvent::BudgetWarning { .. } => "budget_warning",
            CoreEvent::BudgetExhausted { .. } => "budget_exhausted",
            CoreEvent::SpindleWarning { .. } => "spindle_warning",
            CoreEvent::SpindleAbort { .. } => "spindle_abort",
            CoreEvent::TicketCompleted { .. } => "ticket_completed",
            CoreEvent::TicketFailed { .. } => "ticket_failed",
            CoreEvent::UserOverride { .. } => "user_override",
            CoreEvent::HintConsumed { .. } => "hint_consumed",
            CoreEvent::SessionEnd { .. } => "session_end",
        }
    }

    pub fn ticket_id(&self) -> Option<&str> {
        match self {
            CoreEvent::TicketAssigned { ticket_id, .. }
            | CoreEvent::PlanSubmitted { ticket_id, .. }
            | CoreEvent::TicketResult { ticket_id, .. }
            | CoreEvent::QaCommandResult { ticket_id, .. }
            | CoreEvent::QaPassed { ticket_id, .. }
            | CoreEvent::QaFailed { ticket_id, .. }
            | CoreEvent::PrCreated { ticket_id, .. }
            | CoreEvent::SpindleWarning { ticket_id, .. }
            | CoreEvent::SpindleAbort { ticket_id, .. }
            | CoreEvent::TicketCompleted { ticket_id, .. }
            | CoreEvent::TicketFailed { ticket_id, .. }
            | CoreEvent::HintConsumed { ticket_id, .. } => Some(ticket_id),
            _ => None,
        }
    }
}

/// One line of `events.ndjson`: `{ts, step, type, payload}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub ts: DateTime<Utc>,
    pub step: u64,
    #[serde(flatten)]
    pub event: CoreEvent,
}
