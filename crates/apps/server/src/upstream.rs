//! Client for the external text-generation API.
//!
//! Each call sends the fixed system instruction plus exactly one user turn;
//! no history is forwarded. Failures carry operator detail, which the route
//! layer logs and then replaces with a generic message.

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest upstream error body kept for logs.
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("undecodable upstream response: {0}")]
    Decode(String),
    #[error("upstream returned no text")]
    Empty,
}

/// Produces one reply for one user message.
pub trait Generator: Send + Sync {
    fn generate<'a>(&'a self, message: &'a str) -> BoxFuture<'a, Result<String, UpstreamError>>;
}

#[derive(Clone, Debug)]
pub struct GeminiSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub system_instruction: String,
    pub max_output_tokens: u32,
}

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    settings: GeminiSettings,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, settings: GeminiSettings) -> Self {
        Self { http, settings }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }

    async fn generate_content(&self, message: &str) -> Result<String, UpstreamError> {
        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: [Part {
                    text: &self.settings.system_instruction,
                }],
            },
            contents: [Content {
                role: Some("user"),
                parts: [Part { text: message }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.settings.max_output_tokens,
            },
        };

        let resp = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.settings.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let mut body = resp.text().await.unwrap_or_default();
            truncate_on_char_boundary(&mut body, MAX_ERROR_BODY);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|err| UpstreamError::Decode(err.to_string()))?;
        parsed.into_text().ok_or(UpstreamError::Empty)
    }
}

impl Generator for GeminiClient {
    fn generate<'a>(&'a self, message: &'a str) -> BoxFuture<'a, Result<String, UpstreamError>> {
        Box::pin(self.generate_content(message))
    }
}

fn truncate_on_char_boundary(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    s.truncate(cut);
}
