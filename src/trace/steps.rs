//! Step decomposition: group consecutive tool calls into steps by semantic
//! category, so a long trace reads as a handful of phases rather than a
//! flat list of tool calls.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    Read,
    Edit,
    Shell,
    Search,
    Other,
}

pub fn categorize_tool(name: &str) -> ToolCategory {
    match name {
        "read" | "view" | "cat" => ToolCategory::Read,
        "edit" | "write" | "str_replace" => ToolCategory::Edit,
        "bash" | "shell" | "run" => ToolCategory::Shell,
        "grep" | "glob" | "search" => ToolCategory::Search,
        _ => ToolCategory::Other,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub category: ToolCategory,
    pub tool_names: Vec<String>,
    pub call_count: u64,
}

/// Group a flat sequence of tool-call names into steps: a new step starts
/// whenever the semantic category changes.
pub fn decompose_into_steps(tool_call_names: &[String]) -> Vec<Step> {
    let mut steps: Vec<Step> = Vec::new();

    for name in tool_call_names {
        let category = categorize_tool(name);
        match steps.last_mut() {
            Some(step) if step.category == category => {
                step.call_count += 1;
                if !step.tool_names.contains(name) {
                    step.tool_names.push(name.clone());
                }
            }
            _ => steps.push(Step {
                category,
                tool_names: vec![name.clone()],
                call_count: 1,
            }),
        }
    }

    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_same_category_calls_merge_into_one_step() {
        let names = vec!["read".to_string(), "read".to_string(), "bash".to_string()];
        let steps = decompose_into_steps(&names);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].call_count, 2);
    }

    #[test]
    fn category_change_starts_a_new_step() {
        let names = vec!["read".to_string(), "edit".to_string(), "read".to_string()];
        let steps = decompose_into_steps(&names);
        assert_eq!(steps.len(), 3);
    }
}
