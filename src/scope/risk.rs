//! Diff Risk Profile — signals extracted from a unified diff, feeding
//! trust-level decisions in the scope policy.
//!
//! Adapted from `coordination::verifier::risk_profile::DiffRiskProfile`:
//! same `+++ b/` file tracking and `+`/`-` line scan, generalized from
//! "which extra cargo gates to run" to "how much should the Scope Policy
//! Engine trust this plan."

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiffRiskProfile {
    pub has_cargo_toml_change: bool,
    pub has_public_api_change: bool,
    pub has_ci_change: bool,
    pub has_secret_like_line: bool,
    pub has_unsafe_block: bool,
    pub files_changed: usize,
    pub lines_added: usize,
    pub lines_removed: usize,
}

impl DiffRiskProfile {
    pub fn from_diff_text(diff_text: &str) -> Self {
        let mut profile = Self::default();
        let mut current_file = String::new();
        let mut seen_files = std::collections::HashSet::new();

        for line in diff_text.lines() {
            if let Some(rest) = line.strip_prefix("+++ b/") {
                current_file = rest.to_string();
                seen_files.insert(current_file.clone());
                continue;
            }
            if let Some(added) = line.strip_prefix('+') {
                if added.starts_with('+') {
                    continue;
                }
                profile.lines_added += 1;

                if current_file.ends_with("Cargo.toml") {
                    profile.has_cargo_toml_change = true;
                }
                if current_file.starts_with(".github/workflows/") {
                    profile.has_ci_change = true;
                }
                if added.contains("pub fn ")
                    || added.contains("pub struct ")
                    || added.contains("pub trait ")
                    || added.contains("pub enum ")
                {
                    profile.has_public_api_change = true;
                }
                if super::credentials::looks_like_secret(added) {
                    profile.has_secret_like_line = true;
                }
                if added.contains("unsafe ") || added.contains("unsafe{") || added.contains("unsafe\t") {
                    profile.has_unsafe_block = true;
                }
            } else if line.starts_with('-') && !line.starts_with("---") {
                profile.lines_removed += 1;
            }
        }

        profile.files_changed = seen_files.len();
        profile
    }

    /// Extract the set of files touched, in diff order (for file-churn and
    /// scope-policy file checks alike).
    pub fn touched_files(diff_text: &str) -> Vec<String> {
        let mut files = Vec::new();
        for line in diff_text.lines() {
            if let Some(rest) = line.strip_prefix("+++ b/") {
                if !files.iter().any(|f: &String| f == rest) {
                    files.push(rest.to_string());
                }
            }
        }
        files
    }

    pub fn is_high_risk(&self) -> bool {
        self.has_cargo_toml_change
            || self.has_ci_change
            || self.has_secret_like_line
            || self.has_unsafe_block
            || self.files_changed > 20
    }
}
