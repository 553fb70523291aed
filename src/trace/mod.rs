//! Component K — Trace Analysis.

pub mod liveness;
pub mod parser;
pub mod profile;
pub mod steps;
pub mod trigger;

pub use liveness::{analyze_liveness, extract_timestamps, LivenessReport, StallPeriod};
pub use parser::{is_compaction, is_structured, parse_trace, TraceLine};
pub use profile::{build_tool_profiles, ToolProfile};
pub use steps::{categorize_tool, decompose_into_steps, Step, ToolCategory};
pub use trigger::{evaluate_triggers, Alert, Condition, ConditionType, Trigger, TraceMetrics};
