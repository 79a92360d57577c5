//! JSON extraction for free-text model replies
//!
//! Models are asked to answer in JSON but routinely wrap the payload in prose
//! or a ```json fenced block. The lookup runs in two stages:
//!
//! 1. The first fenced block tagged `json`; its interior is the candidate.
//! 2. Only when no fenced block exists: everything from the first `{` to the
//!    last `}` in the reply.
//!
//! The candidate must parse as a JSON object. Nested or unbalanced braces that
//! trip the greedy stage are treated as ordinary parse failures.
//!
//! This is the containment boundary for malformed upstream output: callers
//! always get either a syntactically valid object or their own fallback. The
//! object is passed through verbatim, so its field set may not match the
//! schema the prompt asked for.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

fn fenced_block() -> &'static Regex {
    static FENCED: OnceLock<Regex> = OnceLock::new();
    FENCED.get_or_init(|| {
        Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("fenced block pattern is valid")
    })
}

/// Find the substring most likely to hold the reply's JSON object
fn candidate(response: &str) -> Option<&str> {
    if let Some(caps) = fenced_block().captures(response) {
        return caps.get(1).map(|m| m.as_str());
    }

    let start = response.find('{');
    let end = response.rfind('}');

    match (start, end) {
        (Some(s), Some(e)) if s < e => Some(&response[s..=e]),
        _ => None,
    }
}

/// Extract the embedded JSON object from a model reply
///
/// Returns `None` when no candidate is found or the candidate is not a JSON
/// object.
pub fn extract_json_object(response: &str) -> Option<Map<String, Value>> {
    let json_str = candidate(response)?;

    match serde_json::from_str::<Value>(json_str) {
        Ok(Value::Object(map)) => Some(map),
        Ok(other) => {
            debug!(kind = json_kind(&other), "Extracted JSON is not an object");
            None
        }
        Err(e) => {
            debug!(error = %e, "Extracted candidate is not valid JSON");
            None
        }
    }
}

/// Extract the embedded JSON object, or return `fallback` unchanged
pub fn extract_or_fallback(response: &str, fallback: Value) -> Value {
    match extract_json_object(response) {
        Some(map) => Value::Object(map),
        None => {
            warn!(
                raw = %truncate(response.trim(), 200),
                "No JSON object in AI reply, using fallback"
            );
            fallback
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Truncate long replies for log lines, respecting char boundaries
fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &s[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_fenced_block() {
        let response = "Here you go:\n```json\n{\"a\":1}\n```";
        let result = extract_json_object(response).unwrap();
        assert_eq!(Value::Object(result), json!({"a": 1}));
    }

    #[test]
    fn test_extract_bare_object() {
        let result = extract_json_object("{\"x\": 2}").unwrap();
        assert_eq!(Value::Object(result), json!({"x": 2}));
    }

    #[test]
    fn test_extract_bare_object_with_prose() {
        let response = r#"Sure! Here's the analysis:
{"merchantName": "Shoprite", "totalAmount": "₦4,500"}
Let me know if you need anything else."#;
        let result = extract_json_object(response).unwrap();
        assert_eq!(result["merchantName"], "Shoprite");
        assert_eq!(result["totalAmount"], "₦4,500");
    }

    #[test]
    fn test_fenced_block_takes_precedence() {
        let response = "{\"bare\": true}\n```json\n{\"fenced\": true}\n```";
        let result = extract_json_object(response).unwrap();
        assert_eq!(Value::Object(result), json!({"fenced": true}));
    }

    #[test]
    fn test_first_fenced_block_wins() {
        let response = "```json\n{\"n\": 1}\n```\nand\n```json\n{\"n\": 2}\n```";
        let result = extract_json_object(response).unwrap();
        assert_eq!(result["n"], 1);
    }

    #[test]
    fn test_nested_objects_survive_greedy_match() {
        let response = r#"Result: {"monthlyTrends": {"totalSpending": "$100"}, "healthImpact": "ok"} done"#;
        let result = extract_json_object(response).unwrap();
        assert_eq!(result["monthlyTrends"]["totalSpending"], "$100");
    }

    #[test]
    fn test_two_bare_objects_fail() {
        // Greedy span covers both objects; that is an accepted failure
        let response = r#"{"a": 1} and also {"b": 2}"#;
        assert!(extract_json_object(response).is_none());
    }

    #[test]
    fn test_no_json() {
        assert!(extract_json_object("no json here at all").is_none());
    }

    #[test]
    fn test_closing_brace_before_opening() {
        assert!(extract_json_object("} nothing {").is_none());
    }

    #[test]
    fn test_invalid_fenced_block_does_not_fall_through() {
        let response = "```json\n{not json}\n```\n{\"valid\": true}";
        assert!(extract_json_object(response).is_none());
    }

    #[test]
    fn test_fenced_array_is_not_an_object() {
        let response = "```json\n[1, 2, 3]\n```";
        assert!(extract_json_object(response).is_none());
    }

    #[test]
    fn test_off_schema_object_passes_through() {
        let response = r#"{"unexpected": "field", "count": 3}"#;
        let value = extract_or_fallback(response, json!({"fallback": true}));
        assert_eq!(value, json!({"unexpected": "field", "count": 3}));
    }

    #[test]
    fn test_extract_or_fallback_uses_fallback() {
        let fallback = json!({"merchantName": "Receipt Analysis"});
        let value = extract_or_fallback("no json here at all", fallback.clone());
        assert_eq!(value, fallback);
    }

    #[test]
    fn test_truncate_multibyte() {
        let s = "₦".repeat(100);
        let t = truncate(&s, 10);
        assert!(t.ends_with("..."));
        assert!(t.len() <= 13);
    }
}
