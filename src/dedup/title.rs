//! Title normalization and bag-of-tokens similarity.

use std::collections::HashSet;

/// Lowercase, collapse whitespace, strip punctuation. Idempotent — applying
/// it twice gives the same result as once.
pub fn normalize_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut last_was_space = false;
    for ch in title.chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            last_was_space = false;
        } else if ch.is_whitespace() || ch.is_ascii_punctuation() {
            if !last_was_space && !out.is_empty() {
                out.push(' ');
                last_was_space = true;
            }
        }
    }
    out.trim_end().to_string()
}

fn tokens(normalized: &str) -> HashSet<&str> {
    normalized.split_whitespace().collect()
}

/// Symmetric Jaccard similarity over normalized-title tokens, in `[0, 1]`.
pub fn title_similarity(a: &str, b: &str) -> f64 {
    let na = normalize_title(a);
    let nb = normalize_title(b);
    let ta = tokens(&na);
    let tb = tokens(&nb);
    if ta.is_empty() && tb.is_empty() {
        return 1.0;
    }
    let intersection = ta.intersection(&tb).count();
    let union = ta.union(&tb).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize_title("Fix: the Bug!!  in Parser.rs");
        let twice = normalize_title(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn normalize_collapses_whitespace_and_punctuation() {
        assert_eq!(normalize_title("Refactor   module,  please!"), "refactor module please");
    }

    #[test]
    fn similarity_is_symmetric() {
        let a = "Fix the flaky test in parser";
        let b = "Fix flaky parser test";
        assert_eq!(title_similarity(a, b), title_similarity(b, a));
    }

    #[test]
    fn identical_titles_have_similarity_one() {
        assert_eq!(title_similarity("Add docs", "add docs!"), 1.0);
    }

    #[test]
    fn similarity_in_unit_range() {
        let sim = title_similarity("Fix the bug", "Refactor the module");
        assert!((0.0..=1.0).contains(&sim));
    }
}
