//! Line-delimited JSON trace parsing. A trace is "structured"
//! iff its first parseable line has `type` in `{assistant, system, result}`;
//! otherwise it's treated as opaque text and only liveness analysis runs
//! over it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceLine {
    #[serde(rename = "type")]
    pub line_type: String,
    pub subtype: Option<String>,
    #[serde(flatten)]
    pub raw: Value,
}

const KNOWN_TYPES: &[&str] = &["assistant", "system", "result"];

pub fn parse_trace(text: &str) -> Vec<TraceLine> {
    text.lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|line| serde_json::from_str::<TraceLine>(line).ok())
        .collect()
}

/// Whether `text` is a structured trace: its first parseable line names a
/// known type.
pub fn is_structured(text: &str) -> bool {
    text.lines()
        .filter(|l| !l.trim().is_empty())
        .find_map(|line| serde_json::from_str::<TraceLine>(line).ok())
        .map(|line| KNOWN_TYPES.contains(&line.line_type.as_str()))
        .unwrap_or(false)
}

/// A compaction event: `type == "system" && subtype == "compaction"`.
pub fn is_compaction(line: &TraceLine) -> bool {
    line.line_type == "system" && line.subtype.as_deref() == Some("compaction")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_structured_trace() {
        let text = r#"{"type":"assistant","message":"hi"}
{"type":"result","message":"done"}"#;
        assert!(is_structured(text));
    }

    #[test]
    fn unstructured_text_is_not_structured() {
        assert!(!is_structured("just some plain log lines\nanother line"));
    }

    #[test]
    fn malformed_lines_are_skipped_when_parsing() {
        let text = "{not json}\n{\"type\":\"assistant\",\"x\":1}";
        let lines = parse_trace(text);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn detects_compaction_events() {
        let line: TraceLine = serde_json::from_str(r#"{"type":"system","subtype":"compaction"}"#).unwrap();
        assert!(is_compaction(&line));
    }
}
