//! Proposal and Ticket data model.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Risk {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Trivial,
    Simple,
    Moderate,
    Complex,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Refactor,
    Test,
    Docs,
    Fix,
    Security,
    Perf,
    Types,
    Cleanup,
    Deps,
    Auth,
    Config,
    Migration,
    Other(String),
}

impl Category {
    pub fn is_docs(&self) -> bool {
        matches!(self, Category::Docs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Ready,
    InProgress,
    Done,
    Blocked,
}

/// A candidate change surfaced by the scout, prior to promotion to a ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub category: Category,
    pub title: String,
    pub description: String,
    pub files: Vec<String>,
    pub allowed_paths: Vec<String>,
    pub confidence: u8,
    pub impact_score: u8,
    pub estimated_complexity: Complexity,
    pub risk: Risk,
    pub touched_files_estimate: usize,
}

/// A candidate change driven through the Ticket State Machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub category: Category,
    pub allowed_paths: Vec<String>,
    pub forbidden_paths: Vec<String>,
    pub verification_commands: Vec<String>,
    pub priority: u8,
    pub confidence: u8,
    pub impact_score: u8,
    pub complexity: Complexity,
}

impl Ticket {
    pub fn from_proposal(id: impl Into<String>, project_id: impl Into<String>, p: &Proposal) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            title: p.title.clone(),
            description: p.description.clone(),
            status: TicketStatus::Ready,
            category: p.category.clone(),
            allowed_paths: p.allowed_paths.clone(),
            forbidden_paths: Vec::new(),
            verification_commands: Vec::new(),
            priority: p.impact_score,
            confidence: p.confidence,
            impact_score: p.impact_score,
            complexity: p.estimated_complexity,
        }
    }
}

/// A submitted execution plan, validated by the Scope Policy Engine (§4.6)
/// before a PLAN -> EXECUTE transition is legal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedPlan {
    pub files: Vec<String>,
    pub estimated_lines: u32,
    pub risk_level: Risk,
}
