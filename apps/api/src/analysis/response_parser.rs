//! Response Parser — pulls the JSON object out of a provider's raw reply.
//!
//! Providers are told to emit JSON only, but they still prepend commentary or wrap the
//! object in code fences. The candidate object is the span from the first `{` to the
//! last `}`; that span must then decode strictly.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no JSON object found in provider reply")]
    NoJsonFound,

    #[error("malformed JSON in provider reply: {0}")]
    MalformedJson(String),
}

impl ParseError {
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::NoJsonFound => "no_json_found",
            ParseError::MalformedJson(_) => "malformed_json",
        }
    }
}

/// Extracts and decodes the JSON object embedded in `reply`.
pub fn parse_reply(reply: &str) -> Result<Value, ParseError> {
    let span = json_object_span(strip_json_fences(reply)).ok_or(ParseError::NoJsonFound)?;

    match serde_json::from_str::<Value>(span) {
        Ok(value) if value.is_object() => Ok(value),
        Ok(_) => Err(ParseError::MalformedJson(
            "top-level value is not an object".to_string(),
        )),
        Err(e) => Err(ParseError::MalformedJson(e.to_string())),
    }
}

/// Returns the `{ ... }` span between the first `{` and the last `}`, if one exists.
fn json_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json_object_parses() {
        let value = parse_reply(r#"{"tasks": [{"title": "Invoice entry"}]}"#).unwrap();
        assert_eq!(value["tasks"][0]["title"], "Invoice entry");
    }

    #[test]
    fn test_json_surrounded_by_prose_parses() {
        let reply = "Sure! Here is the analysis you asked for:\n\
            {\"tasks\": [{\"title\": \"Report prep\", \"score\": 70}]}\n\
            Let me know if you need anything else.";
        let value = parse_reply(reply).unwrap();
        assert_eq!(value["tasks"][0]["score"], 70);
    }

    #[test]
    fn test_json_in_code_fence_parses() {
        let reply = "```json\n{\"tasks\": []}\n```";
        let value = parse_reply(reply).unwrap();
        assert!(value["tasks"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_prose_without_braces_is_no_json_found() {
        let err = parse_reply("I'm sorry, I can't analyze this document.").unwrap_err();
        assert!(matches!(err, ParseError::NoJsonFound));
        assert_eq!(err.kind(), "no_json_found");
    }

    #[test]
    fn test_closing_brace_before_opening_is_no_json_found() {
        let err = parse_reply("} nothing useful {").unwrap_err();
        assert!(matches!(err, ParseError::NoJsonFound));
    }

    #[test]
    fn test_truncated_object_is_malformed() {
        let err = parse_reply(r#"{"tasks": [{"title": "Cut off"}, {"title": }"#).unwrap_err();
        assert!(matches!(err, ParseError::MalformedJson(_)));
        assert_eq!(err.kind(), "malformed_json");
    }

    #[test]
    fn test_two_objects_with_prose_between_is_malformed() {
        let err = parse_reply(r#"{"a": 1} and also {"b": 2}"#).unwrap_err();
        assert!(matches!(err, ParseError::MalformedJson(_)));
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }
}
