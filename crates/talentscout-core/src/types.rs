//! Request/response framing for hosting a conversation behind a boundary.

use serde::{Deserialize, Serialize};

use crate::session::Stage;

/// One utterance addressed to a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRequest {
    pub session_id: String,
    pub utterance: String,
}

/// The reply to a [`TurnRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    /// Reply in the conversation's display language. Empty for ignored input.
    pub reply: String,

    /// Stage after the turn.
    pub stage: Stage,

    /// True once the interview is complete or the candidate has left.
    pub done: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_camel_case() {
        let request: TurnRequest =
            serde_json::from_str(r#"{"sessionId": "abc", "utterance": "hi"}"#).unwrap();
        assert_eq!(request.session_id, "abc");
        assert_eq!(request.utterance, "hi");
    }

    #[test]
    fn test_response_shape() {
        let response = TurnResponse {
            reply: "Enter your email address:".to_string(),
            stage: Stage::Email,
            done: false,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "reply": "Enter your email address:",
                "stage": "email",
                "done": false
            })
        );
    }
}
