use std::fmt;

use chat::RelayFailure;
use gloo_net::http::Request;
use protocol::{ChatReply, ChatRequest};

/// POST one message to the relay backend.
///
/// Any non-success status, transport error, or undecodable body collapses to
/// [`RelayFailure::Connection`]; the detail goes to the console.
pub async fn post_chat(endpoint: &str, request: &ChatRequest) -> Result<String, RelayFailure> {
    let resp = Request::post(endpoint)
        .json(request)
        .map_err(|err| connection_failed(&format!("encode failed: {err}")))?
        .send()
        .await
        .map_err(|err| connection_failed(&format!("request failed: {err}")))?;

    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|err| connection_failed(&format!("bad response body: {err}")))?;
    read_reply(status, &body).map_err(|err| connection_failed(&err.to_string()))
}

fn connection_failed(detail: &str) -> RelayFailure {
    crate::warn(&format!("chatbot API error: {detail}"));
    RelayFailure::Connection
}

/// Why a relay response carried no reply text.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplyError {
    Status(u16),
    Body(String),
    Server(String),
}

impl fmt::Display for ReplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplyError::Status(status) => write!(f, "server response status: {status}"),
            ReplyError::Body(err) => write!(f, "bad response body: {err}"),
            ReplyError::Server(msg) => write!(f, "server error: {msg}"),
        }
    }
}

impl From<ReplyError> for RelayFailure {
    fn from(_: ReplyError) -> Self {
        RelayFailure::Connection
    }
}

/// Map a relay response to the reply text. Only a 2xx carrying `{"response"}`
/// succeeds.
fn read_reply(status: u16, body: &str) -> Result<String, ReplyError> {
    if !(200..300).contains(&status) {
        return Err(ReplyError::Status(status));
    }
    let reply: ChatReply =
        serde_json::from_str(body).map_err(|err| ReplyError::Body(err.to_string()))?;
    reply.into_result().map_err(ReplyError::Server)
}
