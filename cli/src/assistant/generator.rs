//! # Reply Generation
//!
//! File: cli/src/assistant/generator.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The external model sits behind the `Generator` trait: one prompt in, one
//! block of text out, or an `ApiError`. The pipeline only ever sees the
//! trait, which keeps it testable with an in-memory generator.
//!
//! `GeminiClient` is the production implementation. It calls the
//! `generateContent` REST endpoint once per request. There is no retry, no
//! backoff and no streaming; the call simply awaits the whole response.
//!
//! ## Wire format
//!
//! ```text
//! POST {api_base}/models/{model}:generateContent
//! x-goog-api-key: {api_key}
//! {"contents":[{"role":"user","parts":[{"text":"<prompt>"}]}]}
//! ```
//!
//! The reply is the concatenated text parts of the first candidate.
//!
use crate::core::error::ApiError;
use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Produces reply text for a fully rendered prompt.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &'static str;

    /// Sends `prompt` to the model and returns its text reply.
    async fn generate(&self, prompt: &str) -> Result<String, ApiError>;
}

/// Google Gemini REST client.
pub struct GeminiClient {
    api_key: String,
    api_base: String,
    model: String,
    client: HttpClient,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        api_base: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let model: String = model.into();
        Self {
            api_key: api_key.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            // Accept both "gemini-1.5-flash" and the full "models/gemini-1.5-flash".
            model: model.trim_start_matches("models/").to_string(),
            client: HttpClient::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: Vec<GeminiRequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiRequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    // Absent when the candidate was blocked.
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

fn extract_text(response: GeminiResponse) -> Result<String, ApiError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(ApiError::NoCandidates)?;

    let text = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();
    Ok(text.trim().to_string())
}

fn map_status(status: StatusCode, details: String) -> ApiError {
    match status.as_u16() {
        401 | 403 => ApiError::AuthenticationFailed { details },
        429 => ApiError::RateLimited { details },
        400 | 404 => ApiError::InvalidRequest { details },
        code @ 500..=599 => ApiError::ServerError {
            status_code: code,
            details,
        },
        code => ApiError::Unknown {
            status_code: code,
            details,
        },
    }
}

#[async_trait]
impl Generator for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiRequestPart { text: prompt }],
            }],
        };
        debug!(
            target: "gemini::generate",
            "POST {} ({} prompt chars)",
            self.endpoint(),
            prompt.chars().count()
        );

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await?;
        let status = response.status();

        if status != StatusCode::OK {
            let error_text = response.text().await?;
            error!(target: "gemini::generate", "Status: {}, Body: {}", status, error_text);
            return Err(map_status(status, error_text));
        }

        // Read the body as text first so a parse failure can be logged with it.
        let response_text = response.text().await?;
        match serde_json::from_str::<GeminiResponse>(&response_text) {
            Ok(parsed) => extract_text(parsed),
            Err(e) => {
                error!(
                    target: "gemini::generate",
                    "Failed to parse JSON: {}. Response body:\n{}",
                    e,
                    response_text
                );
                Err(ApiError::ResponseParsing {
                    details: e.to_string(),
                })
            }
        }
    }
}
