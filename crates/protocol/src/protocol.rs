//! Chat relay protocol.
//!
//! One request carries one user message; there is no session identity and
//! no history. The backend answers with either a `response` or an `error`
//! object:
//! - `200 {"response": "..."}`
//! - `400 {"error": "Message is required"}`
//! - `500 {"error": "<generic failure>"}`

use serde::{Deserialize, Serialize};

/// Route served by the backend and posted to by the widget.
pub const CHAT_ROUTE: &str = "/api/chat";

pub const MESSAGE_REQUIRED: &str = "Message is required";

/// Returned for any upstream failure. Upstream detail is never included.
pub const UPSTREAM_FAILED: &str = "Gemini API failed. Check your key status or quota.";

/// Shown in the widget for any non-success response or network error.
pub const CONNECTION_FAILED: &str =
    "Connection failed. Check if the server is running and your API key is valid.";

/// Shown in the widget when a request outlives the client timeout.
pub const REQUEST_TIMED_OUT: &str = "The guide took too long to answer. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Absent and empty are both rejected by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// The message with surrounding whitespace removed, or `None` if nothing
    /// is left.
    pub fn text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Either body the backend may send, as decoded by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatReply {
    Response(ChatResponse),
    Error(ErrorBody),
}

impl ChatReply {
    pub fn into_result(self) -> Result<String, String> {
        match self {
            ChatReply::Response(r) => Ok(r.response),
            ChatReply::Error(e) => Err(e.error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_serializes_message_field() {
        let json = serde_json::to_string(&ChatRequest::new("Tell me about nebulae")).unwrap();
        assert_eq!(json, r#"{"message":"Tell me about nebulae"}"#);
    }

    #[test]
    fn missing_message_decodes_as_none() {
        let req: ChatRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.message, None);
        assert_eq!(req.text(), None);
    }

    #[test]
    fn blank_message_has_no_text() {
        let req: ChatRequest = serde_json::from_str(r#"{"message":"  \n "}"#).unwrap();
        assert_eq!(req.text(), None);
        assert_eq!(ChatRequest::new(" hi ").text(), Some("hi"));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let req: ChatRequest =
            serde_json::from_str(r#"{"message":"m","history":[1,2]}"#).unwrap();
        assert_eq!(req.text(), Some("m"));
    }

    #[test]
    fn reply_decodes_both_shapes() {
        let ok: ChatReply = serde_json::from_str(r#"{"response":"Nebulae are..."}"#).unwrap();
        assert_eq!(ok.into_result(), Ok("Nebulae are...".to_string()));

        let err: ChatReply = serde_json::from_str(r#"{"error":"Message is required"}"#).unwrap();
        assert_eq!(err.into_result(), Err(MESSAGE_REQUIRED.to_string()));
    }

    #[test]
    fn reply_rejects_unrelated_objects() {
        assert!(serde_json::from_str::<ChatReply>(r#"{"text":"x"}"#).is_err());
    }
}
