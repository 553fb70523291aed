//! spindle-core — the autonomous code-improvement orchestrator core.
//!
//! Owns the session state machine, cycle planner, ticket state machine,
//! wave scheduler, scope policy engine, spindle loop detector, event log,
//! retention/lock subsystem, learnings/critic, dedup & goal measurement,
//! and trace analysis described across the components in this crate.
//! Everything that talks to an LLM, a CLI/TUI, a relational database, a
//! config file parser, git itself, or a PR host lives outside this crate.

pub mod config;
pub mod cycle;
pub mod dedup;
pub mod error;
pub mod events;
pub mod learnings;
pub mod retention;
pub mod scope;
pub mod session;
pub mod spindle;
pub mod ticket;
pub mod trace;
pub mod wave;

pub use config::CoreConfig;
pub use error::{CoreError, CoreResult};

/// Install a stderr `tracing` subscriber honoring `RUST_LOG`, defaulting to
/// `info`. Intended for the host binary's orchestration boundary, where
/// errors from unrelated subsystems are collapsed into `anyhow::Result`
/// rather than threaded through this crate's per-module `thiserror` enums.
pub fn init_tracing() -> anyhow::Result<()> {
    use anyhow::Context;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("installing tracing subscriber")
}
