//! Text-generation model boundary.
//!
//! The pipeline only ever talks to a [`ModelClient`]: one prompt in, one
//! block of text out. [`GeminiClient`] is the production implementation.

mod gemini;

pub use gemini::{GeminiClient, GeminiConfig};

use crate::errors::ModelError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Sampling parameters for one call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_output_tokens: 2048,
        }
    }
}

impl GenerationParams {
    /// Creates generation parameters.
    #[must_use]
    pub fn new(temperature: f32, max_output_tokens: u32) -> Self {
        Self {
            temperature,
            max_output_tokens,
        }
    }
}

/// A single generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Persona framing sent as the system instruction.
    pub system_instruction: String,
    /// The rendered stage prompt.
    pub prompt: String,
    /// Sampling parameters.
    pub params: GenerationParams,
}

impl GenerationRequest {
    /// Creates a new request.
    #[must_use]
    pub fn new(
        system_instruction: impl Into<String>,
        prompt: impl Into<String>,
        params: GenerationParams,
    ) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            prompt: prompt.into(),
            params,
        }
    }
}

/// The text a model produced, plus usage metadata when the provider reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Generated text.
    pub text: String,
    /// Model that answered.
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<f64>,
}

impl GenerationResponse {
    /// Creates a response carrying only text.
    #[must_use]
    pub fn text(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: model.into(),
            input_tokens: None,
            output_tokens: None,
            finish_reason: None,
            latency_ms: None,
        }
    }

    /// Returns total tokens.
    #[must_use]
    pub fn total_tokens(&self) -> u32 {
        self.input_tokens.unwrap_or(0) + self.output_tokens.unwrap_or(0)
    }
}

/// A text-generation endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Generates text for one request.
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ModelError>;
}
