//! Cross-module scenarios, following the shape of
//! `coordination/tests/escalation_integration_test.rs` and
//! `coordination/tests/policy_integration_test.rs`.

use spindle_core::config::{ConflictSensitivity, ScopeDefaults};
use spindle_core::scope::{derive_policy, validate_plan, TrustInputs};
use spindle_core::spindle::{evaluate, SpindleState};
use spindle_core::config::SpindleThresholds;
use spindle_core::ticket::phase::Phase;
use spindle_core::ticket::proposal::{Category, Risk, SubmittedPlan};
use spindle_core::ticket::worker::{Outcome, TicketWorker, WorkerConfig, WorkerEvent};
use spindle_core::wave::{partition_into_waves, WaveItem};
use spindle_core::retention::SessionLock;

fn worker_config(plan_required: bool, cross_qa: bool, prs: bool) -> WorkerConfig {
    WorkerConfig {
        plan_required,
        cross_qa_enabled: cross_qa,
        prs_enabled: prs,
        ticket_step_budget: 1_000,
    }
}

/// A safe refactor ticket in PR delivery mode walks PLAN -> EXECUTE -> QA ->
/// PR -> DONE, with a scope-policy-approved plan gating the first hop.
#[test]
fn single_safe_refactor_completes_through_pr_mode() {
    let defaults = ScopeDefaults::default();
    let policy = derive_policy(&defaults, &Category::Refactor, &["src/**".into()], &[], &TrustInputs::default());

    let plan = SubmittedPlan {
        files: vec!["src/lib.rs".to_string()],
        estimated_lines: 40,
        risk_level: Risk::Low,
    };
    let validation = validate_plan(&policy, &plan);
    assert!(validation.valid, "{:?}", validation.violations);

    let mut worker = TicketWorker::new("t-refactor-1", worker_config(true, false, true));
    let outcome = worker.handle(WorkerEvent::PlanSubmitted { plan, validation }, 1);
    assert_eq!(outcome, Outcome::Advanced(Phase::Execute));

    let outcome = worker.handle(
        WorkerEvent::ExecuteResult {
            success: true,
            pr_url: None,
            scope_expansion_refused: false,
        },
        2,
    );
    assert_eq!(outcome, Outcome::Advanced(Phase::Qa));

    let outcome = worker.handle(
        WorkerEvent::QaResult {
            passed: true,
            error_signature: None,
        },
        3,
    );
    assert_eq!(outcome, Outcome::Advanced(Phase::Pr));

    let outcome = worker.handle(WorkerEvent::PrCreated { url: "https://example/pr/9".into() }, 4);
    assert_eq!(outcome, Outcome::Advanced(Phase::Done));
    assert!(worker.is_terminal());
}

/// A plan repeatedly out of scope is rejected up to the limit, then the
/// ticket fails rather than looping forever.
#[test]
fn plan_scope_violation_retries_then_fails_after_three_rejections() {
    let defaults = ScopeDefaults::default();
    let policy = derive_policy(&defaults, &Category::Refactor, &["src/allowed/**".into()], &[], &TrustInputs::default());

    let mut worker = TicketWorker::new("t-scope-1", worker_config(true, false, true));
    for attempt in 0..3 {
        let plan = SubmittedPlan {
            files: vec!["src/forbidden/secret.rs".to_string()],
            estimated_lines: 10,
            risk_level: Risk::Low,
        };
        let validation = validate_plan(&policy, &plan);
        assert!(!validation.valid);

        let outcome = worker.handle(WorkerEvent::PlanSubmitted { plan, validation }, attempt);
        if attempt < 2 {
            assert!(matches!(outcome, Outcome::Rejected { .. }));
        } else {
            assert_eq!(outcome, Outcome::Advanced(Phase::Failed));
        }
    }
    assert!(worker.is_terminal());
    assert_eq!(worker.state.plan_rejections, 3);
}

/// Two consecutive near-identical diffs trip the oscillation check and
/// abort the ticket before a third retry is attempted.
#[test]
fn oscillating_diffs_trip_spindle_abort() {
    let thresholds = SpindleThresholds::default();
    let mut state = SpindleState::default();

    let diff_a = "fn handler() { let x = compute(); log(x); }".to_string();
    let diff_b = "fn handler() { log(compute()); }".to_string();
    state.record_diff(&diff_a, &thresholds);
    state.record_diff(&diff_b, &thresholds);
    state.record_diff(&diff_a, &thresholds);

    let verdict = evaluate(&state, &thresholds);
    assert!(verdict.should_abort, "{:?}", verdict);
    assert!(verdict.reason.contains("oscillat"));
}

/// QA failing the configured max number of round trips blocks the ticket
/// for human review, distinct from an abort.
#[test]
fn qa_ping_pong_blocks_for_human_review() {
    let thresholds = SpindleThresholds::default();
    let mut state = SpindleState::default();
    for _ in 0..thresholds.max_qa_ping_pong {
        state.record_qa_round_trip();
    }
    let verdict = evaluate(&state, &thresholds);
    assert!(verdict.should_block);
    assert!(!verdict.should_abort);
}

/// Three tickets touching overlapping and disjoint files partition into the
/// expected wave structure under normal conflict sensitivity.
#[test]
fn wave_partition_under_normal_sensitivity() {
    let items = vec![
        WaveItem { ticket_id: "t1".into(), files: vec!["src/auth/login.rs".into()], category: Category::Auth },
        WaveItem { ticket_id: "t2".into(), files: vec!["src/auth/logout.rs".into()], category: Category::Auth },
        WaveItem { ticket_id: "t3".into(), files: vec!["src/billing/invoice.rs".into()], category: Category::Fix },
    ];
    let waves = partition_into_waves(&items, ConflictSensitivity::Normal);

    // t1 and t2 share a directory and category under Normal sensitivity, so
    // they conflict and land in separate waves; t3 is unrelated and joins
    // the first wave that doesn't conflict with it.
    assert_eq!(waves.len(), 2);
    assert!(waves.iter().any(|w| w.contains(&"t1".to_string())));
    assert!(waves.iter().any(|w| w.contains(&"t2".to_string())));
    let t1_wave = waves.iter().position(|w| w.contains(&"t1".to_string())).unwrap();
    let t2_wave = waves.iter().position(|w| w.contains(&"t2".to_string())).unwrap();
    assert_ne!(t1_wave, t2_wave);
}

/// A lock file naming a PID that no longer exists is stolen rather than
/// blocking the new session forever.
#[test]
fn session_lock_is_stolen_from_a_dead_pid() {
    let dir = tempfile::tempdir().unwrap();
    let lock_path = dir.path().join("session.lock");

    let dead = SessionLock::acquire(&lock_path, 999_999_999).unwrap();
    // The stale lock's owning process (999_999_999) is not alive, so a
    // second, real session can acquire it without error.
    let live = SessionLock::acquire(&lock_path, std::process::id());
    assert!(live.is_ok());
    assert!(!dead.is_still_owner().unwrap());
}
