//! User-defined triggers over trace metrics, producing alerts.

use serde::{Deserialize, Serialize};

use super::liveness::LivenessReport;
use super::profile::ToolProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionType {
    IdleRatioAbove,
    ToolErrorCountAbove,
    ToolCallCountAbove,
    MaxGapSecsAbove,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: ConditionType,
    pub threshold: f64,
    pub tool_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trigger {
    pub id: String,
    pub condition: Condition,
    pub action: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub trigger_id: String,
    pub action: String,
    pub observed: f64,
    pub threshold: f64,
}

pub struct TraceMetrics<'a> {
    pub liveness: &'a LivenessReport,
    pub tool_profiles: &'a [ToolProfile],
}

pub fn evaluate_triggers(triggers: &[Trigger], metrics: &TraceMetrics) -> Vec<Alert> {
    triggers
        .iter()
        .filter_map(|trigger| evaluate_one(trigger, metrics))
        .collect()
}

fn evaluate_one(trigger: &Trigger, metrics: &TraceMetrics) -> Option<Alert> {
    let observed = match trigger.condition.condition_type {
        ConditionType::IdleRatioAbove => metrics.liveness.idle_ratio,
        ConditionType::MaxGapSecsAbove => metrics.liveness.max_gap_secs,
        ConditionType::ToolErrorCountAbove => profile_for(trigger, metrics).map(|p| p.error_count as f64).unwrap_or(0.0),
        ConditionType::ToolCallCountAbove => profile_for(trigger, metrics).map(|p| p.call_count as f64).unwrap_or(0.0),
    };

    if observed > trigger.condition.threshold {
        Some(Alert {
            trigger_id: trigger.id.clone(),
            action: trigger.action.clone(),
            observed,
            threshold: trigger.condition.threshold,
        })
    } else {
        None
    }
}

fn profile_for<'a>(trigger: &Trigger, metrics: &TraceMetrics<'a>) -> Option<&'a ToolProfile> {
    let name = trigger.condition.tool_name.as_deref()?;
    metrics.tool_profiles.iter().find(|p| p.name == name)
}
