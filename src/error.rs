//! Crate-wide structured error types.
//!
//! Mirrors `coordination::harness::error::StructuredError`'s agent-recoverable
//! shape: every error the core surfaces to the outer loop carries a
//! machine-readable code and a recovery action, not just a free-text message.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used at crate boundaries.
pub type CoreResult<T> = Result<T, CoreError>;

/// Top-level error type for the orchestrator core.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("scope violation: {0}")]
    ScopeViolation(#[from] ScopeViolation),

    #[error("session lock held by another process (pid {0})")]
    LockHeld(u32),

    #[error("lock lost mid-session")]
    LockLost,

    #[error("budget exhausted: {0}")]
    BudgetExhausted(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("illegal ticket transition: {from:?} -> {to:?}")]
    IllegalTransition { from: String, to: String },
}

/// A scope-policy rejection with enough structure for the agent to self-correct.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ScopeViolation {
    pub code: String,
    pub message: String,
    pub recovery_action: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl ScopeViolation {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        recovery_action: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            recovery_action: recovery_action.into(),
            context: HashMap::new(),
        }
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}
