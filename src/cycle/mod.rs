//! Component B — Cycle Planner.

pub mod bandit;
pub mod cadence;
pub mod cooldown;
pub mod pipeline;

pub use bandit::{Formula, FormulaBandit};
pub use cadence::DocsAuditCadence;
pub use cooldown::{cooldown_allowlist, is_allowed_during_cooldown};
pub use pipeline::{apply_adversarial_revision, dedup_proposals, GatherOutcome};
