//! TicketWorker — the runtime state of one in-flight ticket.
//!
//! Wraps a [`TicketStateMachine`] with the retry counters, budgets, and
//! event-driven transition logic the engine needs to decide what happens
//! next. The decision function is deterministic, mirroring
//! `coordination::escalation::engine::EscalationEngine::decide` — no agent
//! calls here, just state + a fresh result in, a decision out.

use serde::{Deserialize, Serialize};

use super::phase::Phase;
use super::machine::TicketStateMachine;
use super::proposal::{Risk, SubmittedPlan};
use crate::scope::policy::PlanValidation;

const MAX_PLAN_REJECTIONS: u32 = 3;
const MAX_QA_RETRIES: u32 = 3;

/// Configuration affecting which phases a worker passes through.
#[derive(Debug, Clone, Copy)]
pub struct WorkerConfig {
    pub plan_required: bool,
    pub cross_qa_enabled: bool,
    pub prs_enabled: bool,
    pub ticket_step_budget: u64,
}

/// Inputs the worker reacts to, one per legal phase transition.
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    PlanSubmitted {
        plan: SubmittedPlan,
        validation: PlanValidation,
    },
    ExecuteResult {
        success: bool,
        pr_url: Option<String>,
        scope_expansion_refused: bool,
    },
    QaResult {
        passed: bool,
        error_signature: Option<String>,
    },
    PrCreated {
        url: String,
    },
    SpindleAbort {
        reason: String,
    },
    SpindleBlock {
        reason: String,
    },
    StepBudgetExceeded,
    MergeConflictExhausted,
}

/// What the worker did in response to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Advanced(Phase),
    Rejected { plan_rejections: u32 },
    NoOp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketWorkerState {
    pub ticket_id: String,
    pub plan_approved: bool,
    pub plan_rejections: u32,
    pub qa_retries: u32,
    pub step_count: u64,
    pub last_active_at_step: u64,
    pub last_qa_failure: Option<String>,
}

pub struct TicketWorker {
    pub state: TicketWorkerState,
    machine: TicketStateMachine,
    config: WorkerConfig,
}

impl TicketWorker {
    pub fn new(ticket_id: impl Into<String>, config: WorkerConfig) -> Self {
        Self {
            state: TicketWorkerState {
                ticket_id: ticket_id.into(),
                plan_approved: false,
                plan_rejections: 0,
                qa_retries: 0,
                step_count: 0,
                last_active_at_step: 0,
                last_qa_failure: None,
            },
            machine: TicketStateMachine::new(),
            config,
        }
    }

    pub fn phase(&self) -> Phase {
        self.machine.current()
    }

    pub fn is_terminal(&self) -> bool {
        self.machine.is_terminal()
    }

    /// Entry condition for PLAN: docs tickets or `plan_required == false`
    /// skip straight to EXECUTE.
    pub fn maybe_skip_plan(&mut self, step: u64) {
        if self.machine.current() == Phase::Plan && !self.config.plan_required {
            let _ = self.machine.advance(Phase::Execute, step, Some("plan not required"));
        }
    }

    /// Drive the worker with one external event, enforcing the budget gate
    /// first — the step-budget-exhausted jump to FAILED applies before any
    /// other transition is considered.
    pub fn handle(&mut self, event: WorkerEvent, step: u64) -> Outcome {
        self.state.step_count += 1;
        self.state.last_active_at_step = step;

        if self.state.step_count > self.config.ticket_step_budget && !self.machine.is_terminal() {
            let _ = self.machine.fail(step, "ticket step budget exceeded");
            return Outcome::Advanced(Phase::Failed);
        }

        match event {
            WorkerEvent::SpindleAbort { reason } => {
                let _ = self.machine.fail(step, &format!("spindle abort: {reason}"));
                Outcome::Advanced(Phase::Failed)
            }
            WorkerEvent::SpindleBlock { reason } => {
                let _ = self.machine.fail(step, &format!("blocked; human needed: {reason}"));
                Outcome::Advanced(Phase::Failed)
            }
            WorkerEvent::StepBudgetExceeded | WorkerEvent::MergeConflictExhausted => {
                let reason = if matches!(event, WorkerEvent::MergeConflictExhausted) {
                    "merge conflict retry exhausted"
                } else {
                    "ticket step budget exceeded"
                };
                let _ = self.machine.fail(step, reason);
                Outcome::Advanced(Phase::Failed)
            }
            WorkerEvent::PlanSubmitted { plan, validation } => self.handle_plan(plan, validation, step),
            WorkerEvent::ExecuteResult {
                success,
                pr_url,
                scope_expansion_refused,
            } => self.handle_execute_result(success, pr_url, scope_expansion_refused, step),
            WorkerEvent::QaResult {
                passed,
                error_signature,
            } => self.handle_qa_result(passed, error_signature, step),
            WorkerEvent::PrCreated { .. } => {
                let _ = self.machine.advance(Phase::Done, step, Some("pr_created"));
                Outcome::Advanced(Phase::Done)
            }
        }
    }

    fn handle_plan(&mut self, plan: SubmittedPlan, validation: PlanValidation, step: u64) -> Outcome {
        if !validation.valid {
            self.state.plan_rejections += 1;
            if self.state.plan_rejections >= MAX_PLAN_REJECTIONS {
                let _ = self
                    .machine
                    .fail(step, "blocked; human needed: plan rejected 3 times");
                return Outcome::Advanced(Phase::Failed);
            }
            let _ = self
                .machine
                .advance(Phase::Plan, step, Some("plan rejected, revise and resubmit"));
            return Outcome::Rejected {
                plan_rejections: self.state.plan_rejections,
            };
        }

        if plan.risk_level == Risk::High {
            let _ = self
                .machine
                .fail(step, "blocked; human needed: plan risk_level=high");
            return Outcome::Advanced(Phase::Failed);
        }

        self.state.plan_approved = true;
        let _ = self.machine.advance(Phase::Execute, step, Some("plan approved"));
        Outcome::Advanced(Phase::Execute)
    }

    fn handle_execute_result(
        &mut self,
        success: bool,
        pr_url: Option<String>,
        scope_expansion_refused: bool,
        step: u64,
    ) -> Outcome {
        if !success || scope_expansion_refused {
            let reason = if scope_expansion_refused {
                "scope expansion refused"
            } else {
                "execute failed"
            };
            let _ = self.machine.fail(step, reason);
            return Outcome::Advanced(Phase::Failed);
        }

        if pr_url.is_some() {
            let _ = self.machine.advance(Phase::Done, step, Some("inline pr path"));
            return Outcome::Advanced(Phase::Done);
        }

        let next = if self.config.cross_qa_enabled {
            Phase::CrossQa
        } else {
            Phase::Qa
        };
        let _ = self.machine.advance(next, step, Some("execute succeeded"));
        Outcome::Advanced(next)
    }

    fn handle_qa_result(&mut self, passed: bool, error_signature: Option<String>, step: u64) -> Outcome {
        if passed {
            let next = if self.config.prs_enabled { Phase::Pr } else { Phase::Done };
            let _ = self.machine.advance(next, step, Some("qa passed"));
            return Outcome::Advanced(next);
        }

        self.state.qa_retries += 1;
        self.state.last_qa_failure = error_signature;
        if self.state.qa_retries >= MAX_QA_RETRIES {
            let _ = self
                .machine
                .fail(step, "blocked; human needed: qa retries exhausted");
            return Outcome::Advanced(Phase::Failed);
        }
        let _ = self.machine.advance(Phase::Execute, step, Some("qa failed, retry"));
        Outcome::Advanced(Phase::Execute)
    }
}
