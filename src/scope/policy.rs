//! Scope Policy Engine.
//!
//! Derives a [`ScopePolicy`] for a ticket from session defaults and the
//! trust level earned (or lost) against the fragile-path history the
//! Learnings subsystem tracks, then enforces it two ways: [`validate_plan`]
//! checks a submitted plan up front (accumulating every violation, not just
//! the first), and [`is_file_allowed`] gates individual file writes during
//! execution. Grounded on `coordination::reviewer_policy`'s staged,
//! fully-traced pipeline shape, generalized from review stages to scope
//! checks.

use std::path::{Component, Path};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::config::ScopeDefaults;
use crate::ticket::proposal::{Category, Risk, SubmittedPlan};

/// Trust level driving how generous the policy is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustLevel {
    Low,
    Normal,
    Elevated,
    High,
}

impl TrustLevel {
    /// Factor against `ScopeDefaults::max_files` (itself the `normal` value,
    /// 10): low -> 15, normal -> 10, elevated -> 7, high -> 5.
    fn max_files_factor(self) -> f64 {
        match self {
            TrustLevel::Low => 1.5,
            TrustLevel::Normal => 1.0,
            TrustLevel::Elevated => 0.7,
            TrustLevel::High => 0.5,
        }
    }

    fn max_lines_factor(self) -> f64 {
        match self {
            TrustLevel::Low => 1.5,
            TrustLevel::Normal => 1.0,
            TrustLevel::Elevated => 1.0,
            TrustLevel::High => 0.5,
        }
    }

    /// Whether a plan must be submitted for approval before EXECUTE. Low and
    /// normal trust leave the category-derived default unchanged; elevated
    /// and high force it on regardless of category.
    fn plan_required(self, category_default: bool) -> bool {
        match self {
            TrustLevel::Low | TrustLevel::Normal => category_default,
            TrustLevel::Elevated | TrustLevel::High => true,
        }
    }
}

/// Inputs that move trust away from `Normal`, driven by the Learnings
/// subsystem's fragile-path overlap.
#[derive(Debug, Clone, Default)]
pub struct TrustInputs {
    pub category: Option<Category>,
    pub fragile_path_overlap: bool,
    pub consecutive_clean_runs: u32,
}

fn derive_trust_level(inputs: &TrustInputs) -> TrustLevel {
    if inputs.fragile_path_overlap {
        return TrustLevel::Low;
    }
    if matches!(inputs.category, Some(Category::Security)) || matches!(inputs.category, Some(Category::Auth)) {
        return TrustLevel::Low;
    }
    if inputs.consecutive_clean_runs >= 10 {
        TrustLevel::High
    } else if inputs.consecutive_clean_runs >= 5 {
        TrustLevel::Elevated
    } else {
        TrustLevel::Normal
    }
}

/// The materialized policy for one ticket.
#[derive(Debug, Clone)]
pub struct ScopePolicy {
    pub trust_level: TrustLevel,
    pub max_files: usize,
    pub max_lines: u32,
    pub plan_required: bool,
    pub allow: GlobSet,
    pub deny: GlobSet,
}

const DEFAULT_DENY_GLOBS: &[&str] = &[
    ".env*",
    "node_modules/**",
    ".git/**",
    ".swarm-state/**",
    "dist/**",
    "build/**",
    "coverage/**",
    "*.lock",
];

fn base_max_lines(category: &Category, defaults: &ScopeDefaults) -> u32 {
    if category.is_docs() || matches!(category, Category::Test) {
        defaults.max_lines_test
    } else {
        defaults.max_lines_test.saturating_mul(2) / 5
    }
}

fn build_globset(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        if let Ok(glob) = Glob::new(pattern) {
            builder.add(glob);
        }
    }
    builder.build().unwrap_or_else(|_| GlobSetBuilder::new().build().unwrap())
}

/// Build the policy that will govern a ticket's files.
pub fn derive_policy(
    defaults: &ScopeDefaults,
    category: &Category,
    allowed_paths: &[String],
    extra_deny: &[String],
    inputs: &TrustInputs,
) -> ScopePolicy {
    let trust_level = derive_trust_level(inputs);
    let max_files = ((defaults.max_files as f64) * trust_level.max_files_factor()).round() as usize;
    let max_lines = ((base_max_lines(category, defaults) as f64) * trust_level.max_lines_factor()).round() as u32;
    let category_default_plan_required = !category.is_docs();

    let mut deny_patterns: Vec<String> = DEFAULT_DENY_GLOBS.iter().map(|s| s.to_string()).collect();
    deny_patterns.extend(extra_deny.iter().cloned());

    ScopePolicy {
        trust_level,
        max_files: max_files.max(1),
        max_lines: max_lines.max(1),
        plan_required: trust_level.plan_required(category_default_plan_required),
        allow: build_globset(allowed_paths),
        deny: build_globset(&deny_patterns),
    }
}

/// Result of validating a submitted plan against a [`ScopePolicy`].
/// Accumulates every violation rather than short-circuiting on the first,
/// so a rejected plan tells the agent everything wrong with it at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanValidation {
    pub valid: bool,
    pub violations: Vec<String>,
}

pub fn validate_plan(policy: &ScopePolicy, plan: &SubmittedPlan) -> PlanValidation {
    let mut violations = Vec::new();

    if plan.files.len() > policy.max_files {
        violations.push(format!(
            "plan touches {} files, exceeds max_files={}",
            plan.files.len(),
            policy.max_files
        ));
    }
    if plan.estimated_lines > policy.max_lines {
        violations.push(format!(
            "plan estimates {} lines, exceeds max_lines={}",
            plan.estimated_lines, policy.max_lines
        ));
    }
    if plan.risk_level == Risk::High {
        violations.push("plan self-reports risk_level=high".to_string());
    }
    for file in &plan.files {
        if !is_file_allowed(policy, Path::new("."), Path::new(file)) {
            violations.push(format!("file not allowed by scope policy: {file}"));
        }
    }

    PlanValidation {
        valid: violations.is_empty(),
        violations,
    }
}

/// Runtime gate for one file write: worktree containment, then deny globs,
/// then allow globs.
pub fn is_file_allowed(policy: &ScopePolicy, worktree_root: &Path, candidate: &Path) -> bool {
    if !is_contained(worktree_root, candidate) {
        return false;
    }
    let rel = candidate.strip_prefix(worktree_root).unwrap_or(candidate);
    if policy.deny.is_match(rel) {
        return false;
    }
    if policy.allow.matches_or_empty(rel) {
        return true;
    }
    false
}

trait AllowSemantics {
    fn matches_or_empty(&self, path: &Path) -> bool;
}

impl AllowSemantics for GlobSet {
    fn matches_or_empty(&self, path: &Path) -> bool {
        self.is_empty() || self.is_match(path)
    }
}

fn is_contained(root: &Path, candidate: &Path) -> bool {
    !candidate
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir))
        || candidate.starts_with(root)
}
