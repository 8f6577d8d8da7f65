//! Google Generative Language (`generateContent`) client.

use super::{GenerationRequest, GenerationResponse, ModelClient};
use crate::errors::{ModelError, SitecrewError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

/// Longest error body kept in a [`ModelError::Http`].
const MAX_ERROR_BODY: usize = 512;

/// Connection settings for [`GeminiClient`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key sent in the `x-goog-api-key` header.
    pub api_key: String,
    /// Model name, e.g. "gemini-1.5-flash".
    pub model: String,
    /// Base URL up to and including the API version.
    pub api_base: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// HTTP client for Gemini models.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the API key is blank or the HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> Result<Self, SitecrewError> {
        if config.api_key.trim().is_empty() {
            return Err(SitecrewError::Config("Gemini API key is empty".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SitecrewError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Returns the model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ModelError> {
        let body = GenerateContentRequest::from(request);
        let start = Instant::now();

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_transport_error(&e, self.config.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            let mut text = response.text().await.unwrap_or_default();
            truncate_at_char_boundary(&mut text, MAX_ERROR_BODY);
            return Err(ModelError::Http {
                status: status.as_u16(),
                body: text,
                retry_after,
            });
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Decode(e.to_string()))?;

        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
        let mut generated = payload.into_response(&self.config.model)?;
        generated.latency_ms = Some(latency_ms);

        debug!(
            model = %generated.model,
            input_tokens = generated.input_tokens,
            output_tokens = generated.output_tokens,
            latency_ms,
            "Gemini call completed"
        );

        Ok(generated)
    }
}

fn classify_transport_error(err: &reqwest::Error, timeout: Duration) -> ModelError {
    if err.is_timeout() {
        ModelError::Timeout(timeout)
    } else {
        ModelError::Transport(err.to_string())
    }
}

fn truncate_at_char_boundary(text: &mut String, max: usize) {
    if text.len() > max {
        let mut cut = max;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

impl From<&GenerationRequest> for GenerateContentRequest {
    fn from(request: &GenerationRequest) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: request.system_instruction.clone(),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.params.temperature,
                max_output_tokens: request.params.max_output_tokens,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Content,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
}

impl GenerateContentResponse {
    fn into_response(self, requested_model: &str) -> Result<GenerationResponse, ModelError> {
        let candidate = self.candidates.into_iter().next();
        let finish_reason = candidate.as_ref().and_then(|c| c.finish_reason.clone());
        let text: String = candidate
            .map(|c| c.content.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ModelError::EmptyResponse {
                finish_reason: finish_reason.unwrap_or_else(|| "UNKNOWN".to_string()),
            });
        }

        Ok(GenerationResponse {
            text,
            model: self
                .model_version
                .unwrap_or_else(|| requested_model.to_string()),
            input_tokens: self.usage_metadata.as_ref().and_then(|u| u.prompt_token_count),
            output_tokens: self.usage_metadata.as_ref().and_then(|u| u.candidates_token_count),
            finish_reason,
            latency_ms: None,
        })
    }
}
