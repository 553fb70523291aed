//! Component C — Ticket State Machine.

pub mod machine;
pub mod phase;
pub mod proposal;
pub mod worker;

pub use machine::TicketStateMachine;
pub use phase::{is_legal_transition, IllegalTransition, Phase, TransitionRecord};
pub use proposal::{Category, Complexity, Proposal, Risk, SubmittedPlan, Ticket, TicketStatus};
pub use worker::{Outcome, TicketWorker, TicketWorkerState, WorkerConfig, WorkerEvent};
