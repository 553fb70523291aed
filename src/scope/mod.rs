//! Component E — Scope Policy Engine.

pub mod credentials;
pub mod policy;
pub mod risk;

pub use policy::{derive_policy, is_file_allowed, validate_plan, PlanValidation, ScopePolicy, TrustInputs, TrustLevel};
pub use risk::DiffRiskProfile;
