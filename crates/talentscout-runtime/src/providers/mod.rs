//! Inference provider abstractions for talentscout-runtime.
//!
//! A provider runs a hosted pretrained model on one input text. The
//! translator and question answerer collaborators are built on top of this
//! trait; nothing else in the workspace talks to a model.
//!
//! ## Security
//!
//! Providers hold their API token in an [`ApiToken`], which never shows up in
//! `Debug` or `Display` output.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

mod factory;
mod huggingface;
pub mod secrets;

pub use factory::{ProviderFactory, ProviderRegistry};
pub use huggingface::{HuggingFaceProvider, HuggingFaceProviderFactory, HF_API_TOKEN_ENV};
pub use secrets::{ApiToken, TokenSource};

/// Errors from inference providers.
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Rate limit exceeded, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("Model {model} is loading, estimated {estimated:?}")]
    ModelLoading {
        model: String,
        estimated: Option<Duration>,
    },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Response parse error: {0}")]
    ParseError(String),

    #[error("Authentication failed")]
    AuthError,

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

impl ProviderError {
    /// Whether repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::HttpError(_)
                | ProviderError::RateLimited { .. }
                | ProviderError::ModelLoading { .. }
                | ProviderError::Timeout(_)
        )
    }

    /// How long the server asked us to wait, if it said.
    pub fn retry_hint(&self) -> Option<Duration> {
        match self {
            ProviderError::RateLimited { retry_after } => *retry_after,
            ProviderError::ModelLoading { estimated, .. } => *estimated,
            _ => None,
        }
    }
}

/// Kind of model being invoked; decides the response field to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceTask {
    /// Sequence-to-sequence translation (e.g. `Helsinki-NLP/opus-mt-*`).
    Translation,
    /// Instruction-following text generation (e.g. `google/flan-t5-base`).
    Text2Text,
}

/// One model invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceRequest {
    pub model: String,
    pub task: InferenceTask,
    pub inputs: String,
    /// Generation length cap, for text-to-text models.
    pub max_length: Option<u32>,
}

impl InferenceRequest {
    pub fn translation(model: impl Into<String>, inputs: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            task: InferenceTask::Translation,
            inputs: inputs.into(),
            max_length: None,
        }
    }

    pub fn text2text(model: impl Into<String>, inputs: impl Into<String>, max_length: u32) -> Self {
        Self {
            model: model.into(),
            task: InferenceTask::Text2Text,
            inputs: inputs.into(),
            max_length: Some(max_length),
        }
    }
}

/// Per-call transport settings.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Ask the host to block until a cold model is loaded instead of
    /// answering 503.
    pub wait_for_model: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            wait_for_model: true,
        }
    }
}

/// Output of a model invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceResponse {
    pub text: String,
    pub model: String,
}

/// Provider abstraction allows swapping inference backends.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Run the model named in `request` on its input.
    async fn infer(
        &self,
        request: InferenceRequest,
        config: &InferenceConfig,
    ) -> Result<InferenceResponse, ProviderError>;

    /// Check if provider is usable.
    async fn health_check(&self) -> bool;

    /// Provider name for logs.
    fn name(&self) -> &str;
}
