//! Gemini `generateContent` client.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::client::{GenerationError, GenerationRequest, GenerationResult, TextGenerator};
use crate::config::{ConfigError, ConfigResult, GenerationConfig};

/// Blocking HTTP client for the Gemini API.
pub struct GeminiClient {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
    temperature: Option<f32>,
    timeout_secs: u64,
}

impl GeminiClient {
    /// Build a client from validated configuration.
    pub fn new(config: &GenerationConfig) -> ConfigResult<Self> {
        // reqwest's blocking client applies a 30s default when no timeout is given;
        // an explicit `None` is how "no timeout" is expressed.
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.generate_url(),
            api_key: config.api_key.clone(),
            temperature: config.temperature,
            timeout_secs: config.timeout.map(|t| t.as_secs()).unwrap_or(0),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Request body for `models/{model}:generateContent`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationSettings<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationSettings<'a> {
    response_mime_type: &'a str,
    response_schema: &'a serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Response body from `generateContent`.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

fn build_body<'a>(request: &'a GenerationRequest, temperature: Option<f32>) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![RequestPart {
                text: &request.prompt,
            }],
        }],
        generation_config: GenerationSettings {
            response_mime_type: "application/json",
            response_schema: &request.response_schema,
            temperature,
        },
    }
}

/// Concatenated text of the first candidate.
fn candidate_text(response: GenerateContentResponse) -> GenerationResult<String> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(GenerationError::Blocked(reason));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(GenerationError::EmptyResponse)?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_default();
        let blocked = matches!(
            reason.as_str(),
            "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT"
        );
        return Err(if blocked {
            GenerationError::Blocked(reason)
        } else {
            GenerationError::EmptyResponse
        });
    }

    Ok(text)
}

impl TextGenerator for GeminiClient {
    fn generate(&self, request: &GenerationRequest) -> GenerationResult<String> {
        let started = Instant::now();
        let body = build_body(request, self.temperature);

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout(self.timeout_secs)
                } else {
                    GenerationError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        tracing::debug!(
            template = %request.template,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "generation service responded"
        );

        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
            return Err(GenerationError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| GenerationError::Parse(e.to_string()))?;

        candidate_text(parsed)
    }
}
