//! Greedy graph coloring to partition tickets into conflict-free waves.
//! Each wave runs fully in parallel; waves themselves run in
//! strict barrier order, wave N+1 never starting before wave N completes.

use crate::config::ConflictSensitivity;
use crate::ticket::proposal::Category;

use super::conflict::{conflicts, DEFAULT_CONFLICT_PRONE_FILENAMES};

#[derive(Debug, Clone)]
pub struct WaveItem {
    pub ticket_id: String,
    pub files: Vec<String>,
    pub category: Category,
}

/// Assign each item to the earliest wave that has no conflict with it.
/// Items are processed in input order, so callers control tie-breaking by
/// ordering (e.g. priority-first).
pub fn partition_into_waves(items: &[WaveItem], sensitivity: ConflictSensitivity) -> Vec<Vec<String>> {
    let mut waves: Vec<Vec<usize>> = Vec::new();

    for (idx, item) in items.iter().enumerate() {
        let mut placed = false;
        for wave in waves.iter_mut() {
            let conflicts_with_wave = wave.iter().any(|&other_idx| {
                conflicts(
                    &item.files,
                    &item.category,
                    &items[other_idx].files,
                    &items[other_idx].category,
                    sensitivity,
                    DEFAULT_CONFLICT_PRONE_FILENAMES,
                )
            });
            if !conflicts_with_wave {
                wave.push(idx);
                placed = true;
                break;
            }
        }
        if !placed {
            waves.push(vec![idx]);
        }
    }

    waves
        .into_iter()
        .map(|wave| wave.into_iter().map(|idx| items[idx].ticket_id.clone()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, files: &[&str]) -> WaveItem {
        WaveItem {
            ticket_id: id.to_string(),
            files: files.iter().map(|s| s.to_string()).collect(),
            category: Category::Refactor,
        }
    }

    #[test]
    fn disjoint_tickets_share_a_single_wave() {
        let items = vec![item("t1", &["src/a.rs"]), item("t2", &["src/b.rs"])];
        let waves = partition_into_waves(&items, ConflictSensitivity::Relaxed);
        assert_eq!(waves.len(), 1);
        assert_eq!(waves[0].len(), 2);
    }

    #[test]
    fn conflicting_tickets_split_into_separate_waves() {
        let items = vec![item("t1", &["src/a.rs"]), item("t2", &["src/a.rs"])];
        let waves = partition_into_waves(&items, ConflictSensitivity::Relaxed);
        assert_eq!(waves.len(), 2);
        assert_eq!(waves[0], vec!["t1".to_string()]);
        assert_eq!(waves[1], vec!["t2".to_string()]);
    }

    #[test]
    fn chain_of_conflicts_partitions_by_color() {
        // a conflicts with b, b conflicts with c, a does not conflict with c
        let items = vec![
            item("a", &["src/x.rs"]),
            item("b", &["src/x.rs", "src/y.rs"]),
            item("c", &["src/y.rs"]),
        ];
        let waves = partition_into_waves(&items, ConflictSensitivity::Relaxed);
        assert_eq!(waves.len(), 2);
        assert!(waves[0].contains(&"a".to_string()));
        assert!(waves[0].contains(&"c".to_string()));
        assert_eq!(waves[1], vec!["b".to_string()]);
    }

    #[test]
    fn same_category_same_directory_splits_under_normal_sensitivity() {
        let items = vec![item("a", &["src/mod/a.rs"]), item("b", &["src/mod/b.rs"])];
        let waves = partition_into_waves(&items, ConflictSensitivity::Normal);
        assert_eq!(waves.len(), 2);
    }

    #[test]
    fn different_category_same_directory_shares_a_wave_under_normal_sensitivity() {
        let mut docs = item("docs", &["src/mod/README.md"]);
        docs.category = Category::Docs;
        let items = vec![item("code", &["src/mod/a.rs"]), docs];
        let waves = partition_into_waves(&items, ConflictSensitivity::Normal);
        assert_eq!(waves.len(), 1);
    }
}
