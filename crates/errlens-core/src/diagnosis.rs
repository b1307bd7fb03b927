//! Diagnosis value types
//!
//! [`Diagnosis`] always carries all four fields. Renderers test for key
//! presence, so an unknown field is an empty string, never absent.

use crate::error::{Error, Result};
use errlens_llm::util::mask_api_key;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured classification of an error message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnosis {
    /// Short category label
    #[serde(rename = "type")]
    pub kind: String,
    /// Explanation of the root cause
    pub cause: String,
    /// Actionable remedy, may embed code samples as plain text
    pub solution: String,
    /// Forward-looking guidance
    pub prevention: String,
}

impl Diagnosis {
    /// Create a diagnosis from its four parts
    #[must_use]
    pub fn new(
        kind: impl Into<String>,
        cause: impl Into<String>,
        solution: impl Into<String>,
        prevention: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            cause: cause.into(),
            solution: solution.into(),
            prevention: prevention.into(),
        }
    }
}

/// A validated analysis request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    error_text: String,
}

impl AnalysisRequest {
    /// Validate raw error text from a surface
    ///
    /// The text is kept as given; only the emptiness check ignores
    /// surrounding whitespace.
    ///
    /// # Errors
    /// Returns [`Error::EmptyInput`] for empty or whitespace-only text
    pub fn new(error_text: &str) -> Result<Self> {
        if error_text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }
        Ok(Self {
            error_text: error_text.to_string(),
        })
    }

    /// The error text to analyze
    #[must_use]
    pub fn error_text(&self) -> &str {
        &self.error_text
    }

    /// Take ownership of the error text
    #[must_use]
    pub fn into_error_text(self) -> String {
        self.error_text
    }
}

/// Analysis mode supplied by the host's configuration
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AnalysisMode {
    /// Try the remote service before the heuristic
    pub ai_enabled: bool,
    /// Remote service credential, absent when not configured
    pub credential: Option<String>,
}

impl fmt::Debug for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisMode")
            .field("ai_enabled", &self.ai_enabled)
            .field("credential", &self.credential.as_deref().map(mask_api_key))
            .finish()
    }
}

impl AnalysisMode {
    /// Remote-first analysis using the given credential
    #[must_use]
    pub fn ai(credential: impl Into<String>) -> Self {
        Self {
            ai_enabled: true,
            credential: Some(credential.into()),
        }
    }

    /// Heuristic-only analysis
    #[must_use]
    pub fn heuristic_only() -> Self {
        Self {
            ai_enabled: false,
            credential: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_all_keys_even_when_empty() {
        let json = serde_json::to_value(Diagnosis::default()).unwrap();
        let obj = json.as_object().unwrap();
        for key in ["type", "cause", "solution", "prevention"] {
            assert_eq!(obj.get(key), Some(&serde_json::Value::String(String::new())));
        }
        assert_eq!(obj.len(), 4);
    }

    #[test]
    fn test_kind_renamed_to_type() {
        let diagnosis = Diagnosis::new("X", "Y", "Z", "W");
        let json = serde_json::to_string(&diagnosis).unwrap();
        assert_eq!(
            json,
            r#"{"type":"X","cause":"Y","solution":"Z","prevention":"W"}"#
        );
    }

    #[test]
    fn test_request_rejects_blank_text() {
        assert!(matches!(AnalysisRequest::new(""), Err(Error::EmptyInput)));
        assert!(matches!(AnalysisRequest::new(" \n\t "), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_request_keeps_text_as_given() {
        let request = AnalysisRequest::new("  TypeError: x is not a function \n").unwrap();
        assert_eq!(request.error_text(), "  TypeError: x is not a function \n");
    }

    #[test]
    fn test_mode_debug_masks_credential() {
        let mode = AnalysisMode::ai("sk-1234567890abcdefghij");
        let debug_str = format!("{:?}", mode);
        assert!(!debug_str.contains("1234567890"));
        assert!(debug_str.contains("ai_enabled: true"));
    }

    #[test]
    fn test_heuristic_only_mode() {
        let mode = AnalysisMode::heuristic_only();
        assert!(!mode.ai_enabled);
        assert!(mode.credential.is_none());
    }
}
