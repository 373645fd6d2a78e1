//! Extracts JSON from free-form model text.
//!
//! Models do not reliably honour "JSON only": replies arrive wrapped in
//! markdown fences and occasionally carry raw control characters inside
//! string literals. Contract of [`parse_model_json`]:
//!
//! 1. strip an optional fenced block,
//! 2. parse leniently (raw control characters inside strings are accepted),
//! 3. on failure replace literal CR/LF with spaces and parse once more,
//! 4. otherwise fail with the second parse error.
//!
//! Step 2 already accepts raw CR/LF inside strings, so step 3 is a last-resort
//! fallback only. Replies it cannot rescue (a backslash directly before a line
//! break, for instance) still fail with `LlmError::Parse`.

use std::borrow::Cow;

use serde_json::Value;
use tracing::debug;

use super::LlmError;

const FENCE: &str = "```";

/// Returns the content between the first fence marker (minus an optional
/// `json` language tag) and the next one. Text without fences is returned
/// trimmed; an unterminated fence yields everything after it.
pub fn strip_json_fences(text: &str) -> &str {
    let Some(open) = text.find(FENCE) else {
        return text.trim();
    };
    let rest = &text[open + FENCE.len()..];
    let rest = rest
        .strip_prefix("json")
        .or_else(|| rest.strip_prefix("JSON"))
        .unwrap_or(rest);
    match rest.find(FENCE) {
        Some(close) => rest[..close].trim(),
        None => rest.trim(),
    }
}

/// Fence strip, then a single strict parse. Used where a malformed reply is
/// recoverable by the caller.
pub fn parse_fenced_json(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(strip_json_fences(text))
}

/// Two-stage parse of model output. See the module docs.
pub fn parse_model_json(text: &str) -> Result<Value, LlmError> {
    let body = strip_json_fences(text);
    match parse_lenient(body) {
        Ok(value) => Ok(value),
        Err(first) => {
            debug!("Lenient JSON parse failed ({first}), retrying without CR/LF");
            let cleaned = body.replace(['\r', '\n'], " ");
            parse_lenient(&cleaned).map_err(LlmError::Parse)
        }
    }
}

fn parse_lenient(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(&escape_control_chars_in_strings(text))
}

/// Escapes raw control characters that appear inside JSON string literals.
/// Characters outside strings are left alone (CR/LF/tab there are plain
/// whitespace to the parser).
fn escape_control_chars_in_strings(text: &str) -> Cow<'_, str> {
    if !text.chars().any(char::is_control) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if !in_string {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
            continue;
        }

        if escaped {
            escaped = false;
            out.push(c);
            continue;
        }

        match c {
            '\\' => {
                escaped = true;
                out.push(c);
            }
            '"' => {
                in_string = false;
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  {\"key\": \"value\"}\n";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_ignores_surrounding_prose() {
        let input = "Here are the filters:\n```json\n{\"a\": 1}\n```\nLet me know!";
        assert_eq!(strip_json_fences(input), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_json_fences_takes_first_block_only() {
        let input = "```json\n{\"a\": 1}\n```\n```json\n{\"b\": 2}\n```";
        assert_eq!(strip_json_fences(input), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_json_fences_unterminated() {
        let input = "```json\n{\"a\": 1}";
        assert_eq!(strip_json_fences(input), "{\"a\": 1}");
    }

    #[test]
    fn test_raw_newline_in_string_fails_strict_but_parses_leniently() {
        let reply = "{\"location_filter\": \"Austin\nTexas\"}";
        assert!(serde_json::from_str::<Value>(reply).is_err());

        let parsed = parse_model_json(reply).unwrap();
        let escaped: Value = serde_json::from_str("{\"location_filter\": \"Austin\\nTexas\"}").unwrap();
        assert_eq!(parsed, escaped);
    }

    #[test]
    fn test_escaped_quotes_do_not_end_string() {
        let reply = "{\"t\": \"say \\\"hi\\\"\tnow\"}";
        let parsed = parse_model_json(reply).unwrap();
        assert_eq!(parsed, json!({"t": "say \"hi\"\tnow"}));
    }

    #[test]
    fn test_newlines_between_tokens_untouched() {
        let reply = "{\n  \"a\": \"x\",\r\n  \"b\": true\n}";
        assert_eq!(parse_model_json(reply).unwrap(), json!({"a": "x", "b": true}));
    }

    #[test]
    fn test_garbage_fails_after_second_stage() {
        let err = parse_model_json("definitely not json\n").unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }

    #[test]
    fn test_raw_carriage_return_line_feed_in_string_parses() {
        let reply = "```json\n{\"location_filter\": \"Austin\r\nTexas\"}\n```";
        assert_eq!(
            parse_model_json(reply).unwrap(),
            json!({"location_filter": "Austin\r\nTexas"})
        );
    }

    #[test]
    fn test_backslash_before_line_break_fails_both_stages() {
        let reply = "{\"t\": \"x\\\ny\"}";
        assert!(parse_lenient(reply).is_err());
        assert!(parse_lenient(&reply.replace(['\r', '\n'], " ")).is_err());
        assert!(matches!(parse_model_json(reply), Err(LlmError::Parse(_))));
    }

    #[test]
    fn test_parse_fenced_json_is_strict() {
        assert!(parse_fenced_json("```json\n{\"42\": 7.5}\n```").is_ok());
        assert!(parse_fenced_json("{\"a\": \"x\ny\"}").is_err());
    }
}
