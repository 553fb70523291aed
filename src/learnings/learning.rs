//! A single piece of accumulated experience and its per-run decay.

use serde::{Deserialize, Serialize};

use super::classify::{ErrorCategory, FailureCategory};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningCategory {
    KnownFix,
    Antipattern,
    CochangeFiles,
    FragilePath,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Learning {
    pub id: String,
    pub text: String,
    pub category: LearningCategory,
    pub source: String,
    pub tags: Vec<String>,
    pub weight: f64,
    pub structured: Option<StructuredLearning>,
}

/// Machine-checkable facet of a learning, when one exists (an error
/// signature to match, a path that's historically fragile, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredLearning {
    pub error_signature: Option<String>,
    pub failure_category: Option<FailureCategory>,
    /// Finer root-cause tag enriching `failure_category`, not replacing it.
    pub root_cause: Option<ErrorCategory>,
    pub fragile_paths: Vec<String>,
    pub cochange_files: Vec<String>,
}

impl Learning {
    pub fn new(id: impl Into<String>, text: impl Into<String>, category: LearningCategory, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            category,
            source: source.into(),
            tags: Vec::new(),
            weight: 1.0,
            structured: None,
        }
    }

    /// Apply one run's worth of decay. Weight never drops below zero; a
    /// learning that hits zero is a candidate for pruning by the caller.
    pub fn decay(&mut self, rate_per_run: f64) {
        self.weight = (self.weight - rate_per_run).max(0.0);
    }

    pub fn reinforce(&mut self, amount: f64) {
        self.weight = (self.weight + amount).min(1.0);
    }

    pub fn is_stale(&self) -> bool {
        self.weight <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decay_floors_at_zero() {
        let mut l = Learning::new("l1", "text", LearningCategory::KnownFix, "qa");
        l.weight = 0.03;
        l.decay(0.05);
        assert_eq!(l.weight, 0.0);
        assert!(l.is_stale());
    }

    #[test]
    fn reinforce_caps_at_one() {
        let mut l = Learning::new("l1", "text", LearningCategory::KnownFix, "qa");
        l.weight = 0.9;
        l.reinforce(0.5);
        assert_eq!(l.weight, 1.0);
    }
}
