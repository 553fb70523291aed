//! Ticket phases and the legal-transition table.
//!
//! Adapted from `crates/swarm-agents/src/state_machine.rs`'s
//! `OrchestratorState`/`is_legal_transition` pair: an explicit enum, a pure
//! guard function, and an append-only transition log so every hop is
//! auditable and illegal hops are caught before they happen rather than
//! papered over.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The ticket lifecycle phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Plan,
    Execute,
    Qa,
    CrossQa,
    Pr,
    Done,
    Failed,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Done | Phase::Failed)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Plan => "PLAN",
            Phase::Execute => "EXECUTE",
            Phase::Qa => "QA",
            Phase::CrossQa => "CROSS_QA",
            Phase::Pr => "PR",
            Phase::Done => "DONE",
            Phase::Failed => "FAILED",
        };
        write!(f, "{s}")
    }
}

/// Legal transitions between phases.
///
/// ```text
/// PLAN     -> PLAN (rejection, re-counted) | EXECUTE | FAILED
/// EXECUTE  -> QA | CROSS_QA | DONE (inline PR path) | FAILED
/// QA       -> EXECUTE (retry) | PR | DONE (PRs disabled) | FAILED
/// CROSS_QA -> EXECUTE (retry, implementer not reviewer) | PR | DONE | FAILED
/// PR       -> DONE | FAILED
/// ```
/// Any non-terminal state may also jump to FAILED (spindle abort/block,
/// budget exhaustion, merge-conflict exhaustion).
pub fn is_legal_transition(from: Phase, to: Phase) -> bool {
    use Phase::*;

    if to == Failed && !from.is_terminal() {
        return true;
    }

    matches!(
        (from, to),
        (Plan, Plan)
            | (Plan, Execute)
            | (Execute, Qa)
            | (Execute, CrossQa)
            | (Execute, Done)
            | (Qa, Execute)
            | (Qa, Pr)
            | (Qa, Done)
            | (CrossQa, Execute)
            | (CrossQa, Pr)
            | (CrossQa, Done)
            | (Pr, Done)
    )
}

/// A single recorded phase transition, kept for replay/diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: Phase,
    pub to: Phase,
    pub step: u64,
    pub reason: Option<String>,
}

/// Error returned when an illegal transition is attempted.
#[derive(Debug, Clone, thiserror::Error)]
#[error("illegal ticket transition: {from} -> {to}")]
pub struct IllegalTransition {
    pub from: Phase,
    pub to: Phase,
}
