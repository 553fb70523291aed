//! Dedup against recent ticket titles and open-PR branch slugs. Exact
//! match always drops; fuzzy match drops at or above the session's
//! configured similarity threshold.

use super::title::{normalize_title, title_similarity};

#[derive(Debug, Clone, PartialEq)]
pub enum DedupOutcome {
    Unique,
    ExactDuplicate { matched: String },
    FuzzyDuplicate { matched: String, similarity: f64 },
}

impl DedupOutcome {
    pub fn is_duplicate(&self) -> bool {
        !matches!(self, DedupOutcome::Unique)
    }
}

/// Check `title` against `existing` titles (recent ticket titles plus
/// open-PR branch slugs, already whatever string form the caller has).
pub fn check_duplicate(title: &str, existing: &[String], fuzzy_threshold: f64) -> DedupOutcome {
    let normalized = normalize_title(title);

    for candidate in existing {
        if normalize_title(candidate) == normalized {
            return DedupOutcome::ExactDuplicate {
                matched: candidate.clone(),
            };
        }
    }

    let mut best: Option<(f64, &String)> = None;
    for candidate in existing {
        let sim = title_similarity(title, candidate);
        if best.as_ref().map(|(s, _)| sim > *s).unwrap_or(true) {
            best = Some((sim, candidate));
        }
    }

    if let Some((sim, matched)) = best {
        if sim >= fuzzy_threshold {
            return DedupOutcome::FuzzyDuplicate {
                matched: matched.clone(),
                similarity: sim,
            };
        }
    }

    DedupOutcome::Unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_is_always_a_duplicate() {
        let existing = vec!["Fix the flaky test".to_string()];
        let outcome = check_duplicate("fix THE flaky test!", &existing, 0.99);
        assert!(matches!(outcome, DedupOutcome::ExactDuplicate { .. }));
    }

    #[test]
    fn fuzzy_match_above_threshold_is_duplicate() {
        let existing = vec!["Fix flaky parser test".to_string()];
        let outcome = check_duplicate("Fix the flaky test in parser", &existing, 0.4);
        assert!(outcome.is_duplicate());
    }

    #[test]
    fn below_threshold_is_unique() {
        let existing = vec!["Add CI pipeline caching".to_string()];
        let outcome = check_duplicate("Rewrite the error module", &existing, 0.6);
        assert_eq!(outcome, DedupOutcome::Unique);
    }
}
