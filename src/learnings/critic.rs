//! Critic: turns accumulated learnings into a short, ranked set of retry
//! strategies, and scores how risky a retry looks.
//!
//! Grounded on `coordination::escalation::engine`'s `decide()` shape: pure
//! functions over state + a fresh report, no LLM calls.

use serde::{Deserialize, Serialize};

use super::learning::{Learning, LearningCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone)]
pub struct RetryRiskInputs {
    pub attempt: u32,
    pub fragile_path_overlap: bool,
    pub known_error_signature_match: bool,
    pub cochange_file_missing: bool,
}

/// `attempt*20 + overlap:+15 + signature_match:+20 + cochange_missing:+10`,
/// capped at 100.
pub fn retry_risk_score(inputs: &RetryRiskInputs) -> u32 {
    let mut score = inputs.attempt * 20;
    if inputs.fragile_path_overlap {
        score += 15;
    }
    if inputs.known_error_signature_match {
        score += 20;
    }
    if inputs.cochange_file_missing {
        score += 10;
    }
    score.min(100)
}

pub fn risk_level(score: u32) -> RiskLevel {
    if score < 30 {
        RiskLevel::Low
    } else if score <= 60 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strategy {
    pub text: String,
    pub confidence: u8,
    pub source_learning_id: String,
}

/// Assemble up to three ranked strategies from the learning pool, with an
/// attempt>=2 fallback when nothing else surfaces. Returns an empty vec when
/// the critic should stay silent (low risk and nothing confident).
pub fn assemble_critic_block(learnings: &[Learning], attempt: u32, risk: RiskLevel) -> Vec<Strategy> {
    let mut candidates: Vec<Strategy> = Vec::new();

    for learning in learnings {
        if learning.is_stale() {
            continue;
        }
        let confidence = (learning.weight * 100.0).round() as u8;
        let text = match learning.category {
            LearningCategory::KnownFix => format!("Apply known fix: {}", learning.text),
            LearningCategory::CochangeFiles => format!("Include cochange files: {}", learning.text),
            LearningCategory::Antipattern => format!("Avoid antipattern: {}", learning.text),
            LearningCategory::FragilePath | LearningCategory::Other => continue,
        };
        candidates.push(Strategy {
            text,
            confidence,
            source_learning_id: learning.id.clone(),
        });
    }

    candidates.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    candidates.truncate(3);

    if candidates.is_empty() && attempt >= 2 {
        candidates.push(Strategy {
            text: "Try a different approach than the previous attempt".to_string(),
            confidence: 40,
            source_learning_id: "fallback".to_string(),
        });
    }

    let has_confident_strategy = candidates.iter().any(|s| s.confidence > 50);
    if matches!(risk, RiskLevel::Low) && !has_confident_strategy {
        return Vec::new();
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known_fix(weight: f64) -> Learning {
        let mut l = Learning::new("l1", "retry with --locked", LearningCategory::KnownFix, "qa");
        l.weight = weight;
        l
    }

    #[test]
    fn retry_risk_caps_at_100() {
        let inputs = RetryRiskInputs {
            attempt: 10,
            fragile_path_overlap: true,
            known_error_signature_match: true,
            cochange_file_missing: true,
        };
        assert_eq!(retry_risk_score(&inputs), 100);
    }

    #[test]
    fn risk_level_boundaries() {
        assert_eq!(risk_level(29), RiskLevel::Low);
        assert_eq!(risk_level(30), RiskLevel::Medium);
        assert_eq!(risk_level(60), RiskLevel::Medium);
        assert_eq!(risk_level(61), RiskLevel::High);
    }

    #[test]
    fn low_risk_with_no_confident_strategy_is_suppressed() {
        let learnings = vec![known_fix(0.2)];
        let strategies = assemble_critic_block(&learnings, 1, RiskLevel::Low);
        assert!(strategies.is_empty());
    }

    #[test]
    fn confident_strategy_survives_even_at_low_risk() {
        let learnings = vec![known_fix(0.9)];
        let strategies = assemble_critic_block(&learnings, 1, RiskLevel::Low);
        assert!(!strategies.is_empty());
    }

    #[test]
    fn attempt_two_with_no_learnings_falls_back() {
        let strategies = assemble_critic_block(&[], 2, RiskLevel::Medium);
        assert_eq!(strategies.len(), 1);
        assert!(strategies[0].text.contains("different approach"));
    }

    #[test]
    fn at_most_three_strategies_surface() {
        let learnings: Vec<Learning> = (0..6).map(|i| known_fix_n(i, 0.9)).collect();
        let strategies = assemble_critic_block(&learnings, 1, RiskLevel::High);
        assert!(strategies.len() <= 3);
    }

    fn known_fix_n(n: u32, weight: f64) -> Learning {
        let mut l = Learning::new(format!("l{n}"), format!("fix {n}"), LearningCategory::KnownFix, "qa");
        l.weight = weight;
        l
    }
}
