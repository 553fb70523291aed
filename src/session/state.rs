//! Session state and the continuation predicate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{RunMode, SessionConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub config: SessionConfig,
    pub started_at: DateTime<Utc>,
    pub deadline: Option<DateTime<Utc>>,
    pub cycles_completed: u32,
    pub prs_created: u32,
    pub step_count: u64,
    pub shutdown_requested: bool,
}

impl Session {
    pub fn new(id: impl Into<String>, config: SessionConfig, started_at: DateTime<Utc>, deadline: Option<DateTime<Utc>>) -> Self {
        Self {
            id: id.into(),
            config,
            started_at,
            deadline,
            cycles_completed: 0,
            prs_created: 0,
            step_count: 0,
            shutdown_requested: false,
        }
    }
}

/// Why the outer loop stopped, ordered by the priority these are checked
/// in: an explicit shutdown always wins, then the PR cap, then the
/// time budget, then the cycle cap. `Continue` is the only non-stop result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Continue,
    ShutdownRequested,
    PrCapReached,
    TimeBudgetExhausted,
    CycleCapReached,
    StepBudgetExhausted,
}

/// Evaluate the session against its own config, in strict priority
/// order. The session keeps running only when every gate is clear.
pub fn evaluate_stop(session: &Session, now: DateTime<Utc>) -> StopReason {
    if session.shutdown_requested {
        return StopReason::ShutdownRequested;
    }
    if session.config.delivery_mode.pr_cap_applies() && session.prs_created >= session.config.max_prs {
        return StopReason::PrCapReached;
    }
    if let Some(deadline) = session.deadline {
        if now >= deadline {
            return StopReason::TimeBudgetExhausted;
        }
    }
    if session.step_count >= session.config.step_budget {
        return StopReason::StepBudgetExhausted;
    }
    if session.config.run_mode != RunMode::Spin && session.cycles_completed >= session.config.max_cycles {
        return StopReason::CycleCapReached;
    }
    StopReason::Continue
}

pub fn should_continue(session: &Session, now: DateTime<Utc>) -> bool {
    evaluate_stop(session, now) == StopReason::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeliveryMode;
    use chrono::Duration;

    fn base_session() -> Session {
        let config = SessionConfig {
            max_prs: 2,
            max_cycles: 10,
            step_budget: 1000,
            ..SessionConfig::default()
        };
        Session::new("s1", config, Utc::now(), None)
    }

    #[test]
    fn shutdown_takes_priority_over_everything() {
        let mut session = base_session();
        session.shutdown_requested = true;
        session.prs_created = 999;
        assert_eq!(evaluate_stop(&session, Utc::now()), StopReason::ShutdownRequested);
    }

    #[test]
    fn pr_cap_stops_before_time_and_cycle_checks() {
        let mut session = base_session();
        session.prs_created = 2;
        assert_eq!(evaluate_stop(&session, Utc::now()), StopReason::PrCapReached);
    }

    #[test]
    fn direct_delivery_mode_ignores_pr_cap() {
        let mut session = base_session();
        session.config.delivery_mode = DeliveryMode::Direct;
        session.prs_created = 999;
        assert!(should_continue(&session, Utc::now()));
    }

    #[test]
    fn time_budget_stops_once_deadline_passes() {
        let mut session = base_session();
        session.deadline = Some(Utc::now() - Duration::seconds(1));
        assert_eq!(evaluate_stop(&session, Utc::now()), StopReason::TimeBudgetExhausted);
    }

    #[test]
    fn cycle_cap_is_the_last_check() {
        let mut session = base_session();
        session.cycles_completed = 10;
        assert_eq!(evaluate_stop(&session, Utc::now()), StopReason::CycleCapReached);
    }

    #[test]
    fn spin_mode_ignores_the_cycle_cap() {
        let mut session = base_session();
        session.config.run_mode = crate::config::RunMode::Spin;
        session.cycles_completed = 999;
        assert!(should_continue(&session, Utc::now()));
    }

    #[test]
    fn clean_session_continues() {
        let session = base_session();
        assert!(should_continue(&session, Utc::now()));
    }
}
