//! Component I — Learnings & Critic.

pub mod classify;
pub mod critic;
pub mod learning;

pub use classify::{classify, classify_root_cause, ErrorCategory, FailureCategory};
pub use critic::{assemble_critic_block, retry_risk_score, risk_level, RetryRiskInputs, RiskLevel, Strategy};
pub use learning::{Learning, LearningCategory, StructuredLearning};
