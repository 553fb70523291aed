//! Proposal gathering pipeline: dedup against recent tickets/PRs, then an
//! optional adversarial second pass that revises confidence/impact scores
//! downward for proposals it doubts.

use crate::dedup::{check_duplicate, DedupOutcome};
use crate::ticket::proposal::Proposal;

#[derive(Debug, Clone)]
pub struct GatherOutcome {
    pub kept: Vec<Proposal>,
    pub dropped_exact: usize,
    pub dropped_fuzzy: usize,
}

/// Drop exact duplicates and fuzzy duplicates (similarity >= threshold)
/// against `recent_titles`, keeping the rest in input order.
pub fn dedup_proposals(proposals: Vec<Proposal>, recent_titles: &[String], fuzzy_threshold: f64) -> GatherOutcome {
    let mut kept = Vec::new();
    let mut dropped_exact = 0;
    let mut dropped_fuzzy = 0;
    let mut seen_titles: Vec<String> = recent_titles.to_vec();

    for proposal in proposals {
        match check_duplicate(&proposal.title, &seen_titles, fuzzy_threshold) {
            DedupOutcome::ExactDuplicate { .. } => dropped_exact += 1,
            DedupOutcome::FuzzyDuplicate { .. } => dropped_fuzzy += 1,
            DedupOutcome::Unique => {
                seen_titles.push(proposal.title.clone());
                kept.push(proposal);
            }
        }
    }

    GatherOutcome {
        kept,
        dropped_exact,
        dropped_fuzzy,
    }
}

/// A second, skeptical pass: an adversarial reviewer's doubt about a
/// proposal pulls its confidence and impact score down, never up.
pub fn apply_adversarial_revision(mut proposal: Proposal, doubt: u8) -> Proposal {
    let discount = doubt.min(100);
    proposal.confidence = proposal.confidence.saturating_sub(discount / 2);
    proposal.impact_score = proposal.impact_score.saturating_sub(discount / 4);
    proposal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::proposal::{Category, Complexity, Risk};

    fn proposal(title: &str) -> Proposal {
        Proposal {
            category: Category::Refactor,
            title: title.to_string(),
            description: "desc".to_string(),
            files: vec![],
            allowed_paths: vec![],
            confidence: 80,
            impact_score: 60,
            estimated_complexity: Complexity::Simple,
            risk: Risk::Low,
            touched_files_estimate: 1,
        }
    }

    #[test]
    fn drops_exact_and_fuzzy_duplicates() {
        let proposals = vec![
            proposal("Fix the flaky parser test"),
            proposal("fix THE flaky parser test!"),
            proposal("Add new caching layer"),
        ];
        let outcome = dedup_proposals(proposals, &[], 0.6);
        assert_eq!(outcome.kept.len(), 2);
        assert_eq!(outcome.dropped_exact, 1);
    }

    #[test]
    fn dedups_within_the_same_batch_not_just_against_history() {
        let proposals = vec![proposal("Refactor error module"), proposal("refactor error module")];
        let outcome = dedup_proposals(proposals, &[], 0.9);
        assert_eq!(outcome.kept.len(), 1);
    }

    #[test]
    fn adversarial_revision_only_lowers_scores() {
        let p = apply_adversarial_revision(proposal("x"), 40);
        assert!(p.confidence <= 80);
        assert!(p.impact_score <= 60);
    }
}
