//! The per-ticket state machine: tracks current phase, validates transitions,
//! and keeps a full transition log for replay.
//!
//! Adapted from `crates/swarm-agents/src/state_machine.rs::StateMachine`.

use super::phase::{is_legal_transition, IllegalTransition, Phase, TransitionRecord};

#[derive(Debug)]
pub struct TicketStateMachine {
    current: Phase,
    transitions: Vec<TransitionRecord>,
}

impl TicketStateMachine {
    pub fn new() -> Self {
        Self {
            current: Phase::Plan,
            transitions: Vec::new(),
        }
    }

    pub fn current(&self) -> Phase {
        self.current
    }

    pub fn is_terminal(&self) -> bool {
        self.current.is_terminal()
    }

    /// Attempt to advance to `to`. Returns an error without mutating state
    /// if the hop is illegal.
    pub fn advance(
        &mut self,
        to: Phase,
        step: u64,
        reason: Option<&str>,
    ) -> Result<(), IllegalTransition> {
        if !is_legal_transition(self.current, to) {
            return Err(IllegalTransition {
                from: self.current,
                to,
            });
        }
        self.transitions.push(TransitionRecord {
            from: self.current,
            to,
            step,
            reason: reason.map(String::from),
        });
        self.current = to;
        Ok(())
    }

    /// Convenience: move to FAILED from any non-terminal state.
    pub fn fail(&mut self, step: u64, reason: &str) -> Result<(), IllegalTransition> {
        self.advance(Phase::Failed, step, Some(reason))
    }

    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }
}

impl Default for TicketStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
