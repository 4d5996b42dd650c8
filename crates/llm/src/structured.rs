//! Typed decoding of JSON objects embedded in model replies
//!
//! Models often wrap the requested object in prose or code fences. The
//! decoder takes the span from the first `{` to the last `}` and decodes it
//! into the caller's type. Every way this can fail is a distinct
//! [`ExtractionFailure`] so callers can pick their own fallback.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Why a reply did not yield the expected object
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionFailure {
    #[error("reply contains no JSON object")]
    NoJsonObject,

    #[error("malformed JSON object: {0}")]
    Malformed(String),

    #[error("JSON object has unexpected shape: {0}")]
    SchemaMismatch(String),
}

/// The substring from the first `{` to the last `}`, inclusive
pub fn json_object_span(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end > start).then(|| &reply[start..=end])
}

/// Decode the embedded object into `T`
pub fn decode_json_object<T: DeserializeOwned>(reply: &str) -> Result<T, ExtractionFailure> {
    let span = json_object_span(reply).ok_or(ExtractionFailure::NoJsonObject)?;

    let value: Value =
        serde_json::from_str(span).map_err(|e| ExtractionFailure::Malformed(e.to_string()))?;

    if !value.is_object() {
        return Err(ExtractionFailure::SchemaMismatch("top level is not an object".into()));
    }

    serde_json::from_value(value).map_err(|e| ExtractionFailure::SchemaMismatch(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Verdict {
        disqualified: bool,
        reason: String,
    }

    #[test]
    fn test_span_ignores_surrounding_prose() {
        let reply = "Sure! Here it is:\n```json\n{\"a\": {\"b\": 1}}\n```\nHope that helps.";
        assert_eq!(json_object_span(reply), Some("{\"a\": {\"b\": 1}}"));
    }

    #[test]
    fn test_span_requires_both_braces() {
        assert_eq!(json_object_span("no braces here"), None);
        assert_eq!(json_object_span("} backwards {"), None);
        assert_eq!(json_object_span("only {open"), None);
    }

    #[test]
    fn test_decode_typed() {
        let reply = r#"Assessment: {"disqualified": true, "reason": "Represented"}"#;
        let verdict: Verdict = decode_json_object(reply).unwrap();
        assert_eq!(
            verdict,
            Verdict {
                disqualified: true,
                reason: "Represented".into()
            }
        );
    }

    #[test]
    fn test_decode_failures_are_distinct() {
        assert_eq!(
            decode_json_object::<Verdict>("I cannot help with that."),
            Err(ExtractionFailure::NoJsonObject)
        );
        assert!(matches!(
            decode_json_object::<Verdict>("{disqualified: yes}"),
            Err(ExtractionFailure::Malformed(_))
        ));
        assert!(matches!(
            decode_json_object::<Verdict>(r#"{"verdict": "ok"}"#),
            Err(ExtractionFailure::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_two_objects_in_one_reply_are_malformed() {
        let reply = r#"{"disqualified": false, "reason": ""} and also {"x": 1}"#;
        assert!(matches!(
            decode_json_object::<Verdict>(reply),
            Err(ExtractionFailure::Malformed(_))
        ));
    }
}
