//! Session Controller: owns the outer loop, the session lock, and
//! SESSION_START/SESSION_END emission.

use std::path::PathBuf;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::events::{CoreEvent, EventBus, RunEventLog};
use crate::retention::SessionLock;

use super::state::{evaluate_stop, Session, StopReason};

pub struct SessionController {
    pub session: Session,
    pub bus: EventBus,
    lock: SessionLock,
}

impl SessionController {
    /// Acquire the session lock and emit SESSION_START. Fails with
    /// [`CoreError::LockHeld`] if another live process holds the lock.
    pub fn start(session: Session, lock_path: PathBuf, log_path: PathBuf, pid: u32) -> CoreResult<Self> {
        let lock = SessionLock::acquire(lock_path, pid)?;
        let log = RunEventLog::open(log_path)?;
        let bus = EventBus::new(log);

        bus.publish(CoreEvent::SessionStart {
            session_id: session.id.clone(),
            run_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
        })
        .map_err(|e| CoreError::BudgetExhausted(e.to_string()))?;

        Ok(Self { session, bus, lock })
    }

    /// Evaluate whether the loop should keep running against its
    /// priority-ordered gates.
    pub fn poll(&self) -> StopReason {
        evaluate_stop(&self.session, Utc::now())
    }

    pub fn should_continue(&self) -> bool {
        self.poll() == StopReason::Continue
    }

    pub fn request_shutdown(&mut self) {
        self.session.shutdown_requested = true;
    }

    /// Confirm the lock wasn't stolen out from under this session mid-run.
    pub fn check_lock(&self) -> CoreResult<()> {
        if self.lock.is_still_owner()? {
            Ok(())
        } else {
            Err(CoreError::LockLost)
        }
    }

    /// Emit SESSION_END and release the lock. Lock release is best-effort
    /// against ownership: if another session stole it, release is a no-op
    /// rather than an error.
    pub fn finish(&self, reason: StopReason) -> CoreResult<()> {
        self.bus
            .publish(CoreEvent::SessionEnd {
                session_id: self.session.id.clone(),
                reason: format!("{reason:?}"),
                timestamp: Utc::now(),
            })
            .map_err(|e| CoreError::BudgetExhausted(e.to_string()))?;
        self.lock.release()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;

    #[test]
    fn start_emits_session_start_and_acquires_lock() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new("s1", SessionConfig::default(), Utc::now(), None);
        let controller = SessionController::start(
            session,
            dir.path().join("session.lock"),
            dir.path().join("events.ndjson"),
            std::process::id(),
        )
        .unwrap();
        assert_eq!(controller.bus.current_step(), 1);
        assert!(controller.check_lock().is_ok());
    }

    #[test]
    fn finish_releases_lock_and_emits_session_end() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new("s1", SessionConfig::default(), Utc::now(), None);
        let lock_path = dir.path().join("session.lock");
        let controller = SessionController::start(session, lock_path.clone(), dir.path().join("events.ndjson"), std::process::id()).unwrap();
        controller.finish(StopReason::CycleCapReached).unwrap();
        assert!(!lock_path.exists());
    }

    #[test]
    fn second_session_cannot_start_while_first_holds_a_live_lock() {
        let dir = tempfile::tempdir().unwrap();
        let lock_path = dir.path().join("session.lock");
        let session1 = Session::new("s1", SessionConfig::default(), Utc::now(), None);
        let _controller1 = SessionController::start(session1, lock_path.clone(), dir.path().join("events1.ndjson"), std::process::id()).unwrap();

        let session2 = Session::new("s2", SessionConfig::default(), Utc::now(), None);
        let result = SessionController::start(session2, lock_path, dir.path().join("events2.ndjson"), std::process::id() + 1);
        assert!(matches!(result, Err(CoreError::LockHeld(_))));
    }
}
