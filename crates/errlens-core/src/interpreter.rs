//! Completion text interpreter
//!
//! Parses the remote completion as a [`Diagnosis`]. Anything that is not a
//! JSON object of string fields becomes a degraded diagnosis that keeps the
//! raw text as its solution, so nothing the service said is lost.

use crate::diagnosis::Diagnosis;
use serde::Deserialize;
use tracing::debug;

/// Lenient wire shape: every key optional, `null` allowed
#[derive(Deserialize)]
struct RawDiagnosis {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    cause: Option<String>,
    #[serde(default)]
    solution: Option<String>,
    #[serde(default)]
    prevention: Option<String>,
}

impl From<RawDiagnosis> for Diagnosis {
    fn from(raw: RawDiagnosis) -> Self {
        Self {
            kind: raw.kind.unwrap_or_default(),
            cause: raw.cause.unwrap_or_default(),
            solution: raw.solution.unwrap_or_default(),
            prevention: raw.prevention.unwrap_or_default(),
        }
    }
}

/// Interpret raw completion text; never fails
#[must_use]
pub fn interpret(raw: &str) -> Diagnosis {
    match parse(raw) {
        Ok(diagnosis) => diagnosis,
        Err(reason) => {
            debug!(reason = %reason, "AI response is not a diagnosis object");
            degraded(raw)
        }
    }
}

fn parse(raw: &str) -> Result<Diagnosis, String> {
    let body = strip_code_fence(raw.trim());
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| e.to_string())?;
    if !value.is_object() {
        return Err("expected a JSON object".to_string());
    }
    let parsed: RawDiagnosis = serde_json::from_value(value).map_err(|e| e.to_string())?;
    Ok(parsed.into())
}

/// Remove one surrounding Markdown code fence, with or without a language tag
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return text;
    };
    // drop the info string ("json"), which may share a line with the body
    let inner = inner.trim_start();
    let tag_len = inner
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(inner.len());
    inner[tag_len..].trim()
}

fn degraded(raw: &str) -> Diagnosis {
    Diagnosis::new(
        "AI Analysis",
        "Raw AI Response",
        raw,
        "AI response format error",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_object() {
        let d = interpret(r#"{"type":"X","cause":"Y","solution":"Z","prevention":"W"}"#);
        assert_eq!(d, Diagnosis::new("X", "Y", "Z", "W"));
    }

    #[test]
    fn test_not_json_is_degraded_verbatim() {
        let d = interpret("not json");
        assert_eq!(
            d,
            Diagnosis::new(
                "AI Analysis",
                "Raw AI Response",
                "not json",
                "AI response format error"
            )
        );
    }

    #[test]
    fn test_missing_and_null_keys_become_empty() {
        let d = interpret(r#"{"type":"Crash","cause":null}"#);
        assert_eq!(d, Diagnosis::new("Crash", "", "", ""));
    }

    #[test]
    fn test_extra_keys_ignored() {
        let d = interpret(
            r#"{"type":"A","cause":"B","solution":"C","prevention":"D","confidence":0.9}"#,
        );
        assert_eq!(d, Diagnosis::new("A", "B", "C", "D"));
    }

    #[test]
    fn test_non_object_is_degraded() {
        for raw in [r#"["a","b","c","d"]"#, r#""just a string""#, "42", "null"] {
            let d = interpret(raw);
            assert_eq!(d.kind, "AI Analysis");
            assert_eq!(d.solution, raw);
        }
    }

    #[test]
    fn test_non_string_field_is_degraded() {
        let raw = r#"{"type":"X","cause":"Y","solution":["step 1","step 2"],"prevention":"W"}"#;
        let d = interpret(raw);
        assert_eq!(d.kind, "AI Analysis");
        assert_eq!(d.solution, raw);
    }

    #[test]
    fn test_code_fenced_json() {
        let raw = "```json\n{\"type\":\"X\",\"cause\":\"Y\",\"solution\":\"Z\",\"prevention\":\"W\"}\n```";
        assert_eq!(interpret(raw), Diagnosis::new("X", "Y", "Z", "W"));

        let bare = "```\n{\"type\":\"X\"}\n```";
        assert_eq!(interpret(bare).kind, "X");
    }

    #[test]
    fn test_single_line_code_fence() {
        let raw = r#"```json {"type":"X","cause":"Y","solution":"Z","prevention":"W"}```"#;
        assert_eq!(interpret(raw), Diagnosis::new("X", "Y", "Z", "W"));

        let untagged = r#"```{"type":"X"}```"#;
        assert_eq!(interpret(untagged).kind, "X");
    }

    #[test]
    fn test_degraded_keeps_untrimmed_text() {
        let raw = "  Here is my analysis:\nUse optional chaining.  ";
        assert_eq!(interpret(raw).solution, raw);
    }

    #[test]
    fn test_solution_with_embedded_code() {
        let raw = r#"{"type":"T","cause":"C","solution":"Use `user?.name`:\n```js\nconst n = user?.name;\n```","prevention":"P"}"#;
        let d = interpret(raw);
        assert_eq!(d.kind, "T");
        assert!(d.solution.contains("const n = user?.name;"));
    }
}
