//! Surface Protocol Messages
//!
//! Inbound messages are tagged by `command`. Outbound analysis outcomes are
//! tagged by `type`, while the selection reply is tagged by `command`, so
//! [`ServerMessage`] is an untagged union of the two families.

use errlens_core::Diagnosis;
use serde::{Deserialize, Serialize};

/// Messages sent from the surface to the controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Analyze an error message
    Analyze {
        /// Error text pasted by the user (missing = empty)
        #[serde(default)]
        error: String,
        /// Optional correlation id, echoed on the outcome
        #[serde(
            default,
            rename = "requestId",
            skip_serializing_if = "Option::is_none"
        )]
        request_id: Option<String>,
    },

    /// Ask for the host editor's current selection
    GetSelectedText,
}

impl ClientMessage {
    /// Create an analyze request
    #[must_use]
    pub fn analyze(error: impl Into<String>) -> Self {
        Self::Analyze {
            error: error.into(),
            request_id: None,
        }
    }
}

/// Result of one analysis request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnalysisOutcome {
    /// A populated diagnosis
    #[serde(rename = "analysis")]
    Success {
        /// The diagnosis
        result: Diagnosis,
    },

    /// An explicit failure message
    #[serde(rename = "error")]
    Failure {
        /// Human-readable message
        message: String,
    },
}

/// Outcome plus the correlation id of the request that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeMessage {
    /// The outcome
    #[serde(flatten)]
    pub outcome: AnalysisOutcome,
    /// Echo of the inbound `requestId`
    #[serde(default, rename = "requestId", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Replies to `getSelectedText`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum SelectionMessage {
    /// The selected text
    #[serde(rename = "selectedText")]
    SelectedText {
        /// Selection contents
        text: String,
    },
}

/// Messages sent from the controller to the surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerMessage {
    /// Analysis outcome
    Outcome(OutcomeMessage),
    /// Selection reply
    Selection(SelectionMessage),
}

impl ServerMessage {
    /// Create a successful analysis message
    #[must_use]
    pub fn analysis(result: Diagnosis, request_id: Option<String>) -> Self {
        Self::Outcome(OutcomeMessage {
            outcome: AnalysisOutcome::Success { result },
            request_id,
        })
    }

    /// Create a failure message
    #[must_use]
    pub fn failure(message: impl Into<String>, request_id: Option<String>) -> Self {
        Self::Outcome(OutcomeMessage {
            outcome: AnalysisOutcome::Failure {
                message: message.into(),
            },
            request_id,
        })
    }

    /// Create a selection reply
    #[must_use]
    pub fn selected_text(text: impl Into<String>) -> Self {
        Self::Selection(SelectionMessage::SelectedText { text: text.into() })
    }

    /// The outcome, if this is an analysis outcome
    #[must_use]
    pub fn outcome(&self) -> Option<&AnalysisOutcome> {
        match self {
            Self::Outcome(message) => Some(&message.outcome),
            Self::Selection(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_analyze() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"command":"analyze","error":"boom"}"#).unwrap();
        assert_eq!(msg, ClientMessage::analyze("boom"));
    }

    #[test]
    fn test_parse_analyze_with_request_id() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"command":"analyze","error":"boom","requestId":"r1"}"#)
                .unwrap();
        assert_eq!(
            msg,
            ClientMessage::Analyze {
                error: "boom".to_string(),
                request_id: Some("r1".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_analyze_without_error_is_empty() {
        let msg: ClientMessage = serde_json::from_str(r#"{"command":"analyze"}"#).unwrap();
        assert_eq!(msg, ClientMessage::analyze(""));
    }

    #[test]
    fn test_parse_get_selected_text() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"command":"getSelectedText"}"#).unwrap();
        assert_eq!(msg, ClientMessage::GetSelectedText);
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"command":"explode"}"#).is_err());
    }

    #[test]
    fn test_analysis_wire_shape() {
        let msg = ServerMessage::analysis(Diagnosis::new("X", "Y", "Z", "W"), None);
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "type": "analysis",
                "result": {"type": "X", "cause": "Y", "solution": "Z", "prevention": "W"}
            })
        );
    }

    #[test]
    fn test_failure_wire_shape_with_request_id() {
        let msg = ServerMessage::failure("Please enter an error message", Some("r7".into()));
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "error", "message": "Please enter an error message", "requestId": "r7"})
        );
    }

    #[test]
    fn test_selected_text_wire_shape() {
        let msg = ServerMessage::selected_text("TypeError: boom");
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"command": "selectedText", "text": "TypeError: boom"})
        );
    }

    #[test]
    fn test_server_message_parses_both_families() {
        let outcome: ServerMessage =
            serde_json::from_str(r#"{"type":"error","message":"nope"}"#).unwrap();
        assert_eq!(outcome, ServerMessage::failure("nope", None));

        let selection: ServerMessage =
            serde_json::from_str(r#"{"command":"selectedText","text":"abc"}"#).unwrap();
        assert_eq!(selection, ServerMessage::selected_text("abc"));
        assert!(selection.outcome().is_none());
    }
}
