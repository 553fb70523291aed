//! Component F — Spindle Loop Detector.

pub mod checks;
pub mod state;

pub use checks::{command_signature, evaluate, jaccard_similarity, spindle_risk, SpindleVerdict};
pub use state::{estimate_tokens, SpindleState};
