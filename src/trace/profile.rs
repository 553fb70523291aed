//! Per-tool usage profiles built from a parsed trace.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::parser::TraceLine;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolProfile {
    pub name: String,
    pub call_count: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub error_count: u64,
}

impl ToolProfile {
    fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Build one profile per tool name, sorted by total tokens descending.
pub fn build_tool_profiles(lines: &[TraceLine]) -> Vec<ToolProfile> {
    let mut profiles: HashMap<String, ToolProfile> = HashMap::new();

    for line in lines {
        for call in extract_tool_calls(&line.raw) {
            let entry = profiles.entry(call.name.clone()).or_insert_with(|| ToolProfile {
                name: call.name.clone(),
                ..Default::default()
            });
            entry.call_count += 1;
            entry.input_tokens += call.input_tokens;
            entry.output_tokens += call.output_tokens;
            if call.is_error {
                entry.error_count += 1;
            }
        }
    }

    let mut out: Vec<ToolProfile> = profiles.into_values().collect();
    out.sort_by(|a, b| b.total_tokens().cmp(&a.total_tokens()).then(a.name.cmp(&b.name)));
    out
}

struct ToolCall {
    name: String,
    input_tokens: u64,
    output_tokens: u64,
    is_error: bool,
}

fn extract_tool_calls(raw: &Value) -> Vec<ToolCall> {
    let mut calls = Vec::new();
    let Some(content) = raw.pointer("/message/content").and_then(Value::as_array) else {
        return calls;
    };
    for item in content {
        let item_type = item.get("type").and_then(Value::as_str).unwrap_or_default();
        if item_type == "tool_use" {
            let name = item.get("name").and_then(Value::as_str).unwrap_or("unknown").to_string();
            let input_tokens = estimate_value_tokens(item.get("input"));
            calls.push(ToolCall {
                name,
                input_tokens,
                output_tokens: 0,
                is_error: false,
            });
        } else if item_type == "tool_result" {
            if let Some(last) = calls.last_mut() {
                last.output_tokens += estimate_value_tokens(item.get("content"));
                last.is_error = item.get("is_error").and_then(Value::as_bool).unwrap_or(false);
            }
        }
    }
    calls
}

fn estimate_value_tokens(value: Option<&Value>) -> u64 {
    match value {
        Some(v) => crate::spindle::estimate_tokens(&v.to_string()),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(json: &str) -> TraceLine {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn aggregates_calls_per_tool_name() {
        let lines = vec![
            line(r#"{"type":"assistant","message":{"content":[{"type":"tool_use","name":"bash","input":{"cmd":"ls"}}]}}"#),
            line(r#"{"type":"assistant","message":{"content":[{"type":"tool_result","content":"file1\nfile2","is_error":false}]}}"#),
            line(r#"{"type":"assistant","message":{"content":[{"type":"tool_use","name":"bash","input":{"cmd":"pwd"}}]}}"#),
        ];
        let profiles = build_tool_profiles(&lines);
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].name, "bash");
        assert_eq!(profiles[0].call_count, 2);
    }

    #[test]
    fn sorted_by_total_tokens_descending() {
        let lines = vec![
            line(r#"{"type":"assistant","message":{"content":[{"type":"tool_use","name":"small","input":{"x":1}}]}}"#),
            line(r#"{"type":"assistant","message":{"content":[{"type":"tool_use","name":"big","input":{"payload":"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"}}]}}"#),
        ];
        let profiles = build_tool_profiles(&lines);
        assert_eq!(profiles[0].name, "big");
    }
}
