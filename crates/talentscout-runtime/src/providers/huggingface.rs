//! Hugging Face Inference API provider.
//!
//! One endpoint serves every hosted model: `POST {base_url}/models/{model}`
//! with the input text. Translation models answer with `translation_text`,
//! text-to-text models with `generated_text`.
//!
//! The HTTP call needs the `huggingface` feature. Without it the provider
//! still builds (so config and token handling stay testable) but every
//! inference returns [`ProviderError::NotConfigured`].

use super::{
    factory::ProviderFactory,
    secrets::{ApiToken, TokenSource},
    InferenceConfig, InferenceProvider, InferenceRequest, InferenceResponse, InferenceTask,
    ProviderError,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;

/// Environment variable holding the Hugging Face API token.
pub const HF_API_TOKEN_ENV: &str = "HF_API_TOKEN";

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";
const TOKEN_NAME: &str = "Hugging Face API token";

/// Hosted-model provider backed by the Hugging Face Inference API.
pub struct HuggingFaceProvider {
    token: ApiToken,
    base_url: String,
}

impl std::fmt::Debug for HuggingFaceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceProvider")
            .field("token", &self.token)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HuggingFaceProvider {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            token: ApiToken::new(api_token, TokenSource::Programmatic, TOKEN_NAME),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from provider settings. `api_token` falls back to
    /// `HF_API_TOKEN`; `base_url` is optional.
    pub fn from_config(config: &JsonValue) -> Result<Self, ProviderError> {
        let token = ApiToken::from_config_or_env(config, "api_token", HF_API_TOKEN_ENV, TOKEN_NAME)?;

        let base_url = config["base_url"]
            .as_str()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        Ok(Self { token, base_url })
    }

    #[cfg_attr(not(feature = "huggingface"), allow(dead_code))]
    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}", self.base_url, model)
    }

    #[cfg(feature = "huggingface")]
    fn client() -> &'static reqwest::Client {
        static CLIENT: std::sync::OnceLock<reqwest::Client> = std::sync::OnceLock::new();
        CLIENT.get_or_init(|| {
            reqwest::Client::builder()
                .build()
                .unwrap_or_else(|_| reqwest::Client::new())
        })
    }
}

#[derive(Debug, Serialize)]
struct HfRequest<'a> {
    inputs: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<HfParameters>,
    options: HfOptions,
}

#[derive(Debug, Serialize)]
struct HfParameters {
    max_length: u32,
}

#[derive(Debug, Serialize)]
struct HfOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct HfOutput {
    translation_text: Option<String>,
    generated_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HfError {
    error: String,
    estimated_time: Option<f64>,
}

#[cfg_attr(not(feature = "huggingface"), allow(dead_code))]
fn request_body<'a>(request: &'a InferenceRequest, config: &InferenceConfig) -> HfRequest<'a> {
    HfRequest {
        inputs: &request.inputs,
        parameters: request.max_length.map(|max_length| HfParameters { max_length }),
        options: HfOptions {
            wait_for_model: config.wait_for_model,
        },
    }
}

/// Pull the output text for `task` out of a success body.
#[cfg_attr(not(feature = "huggingface"), allow(dead_code))]
fn parse_outputs(task: InferenceTask, body: &str) -> Result<String, ProviderError> {
    let outputs: Vec<HfOutput> =
        serde_json::from_str(body).map_err(|e| ProviderError::ParseError(e.to_string()))?;

    let first = outputs
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::ParseError("empty output list".to_string()))?;

    let text = match task {
        InferenceTask::Translation => first.translation_text,
        InferenceTask::Text2Text => first.generated_text,
    };

    text.ok_or_else(|| ProviderError::ParseError(format!("no {:?} output in response", task)))
}

/// Map a non-success status and body onto a provider error.
#[cfg_attr(not(feature = "huggingface"), allow(dead_code))]
fn parse_error(status: u16, model: &str, body: &str) -> ProviderError {
    let detail = serde_json::from_str::<HfError>(body).ok();

    match status {
        401 | 403 => ProviderError::AuthError,
        503 => ProviderError::ModelLoading {
            model: model.to_string(),
            estimated: detail
                .and_then(|d| d.estimated_time)
                .filter(|secs| secs.is_finite() && *secs >= 0.0)
                .map(Duration::from_secs_f64),
        },
        _ => ProviderError::ApiError {
            status,
            message: detail.map(|d| d.error).unwrap_or_else(|| body.to_string()),
        },
    }
}

#[async_trait]
impl InferenceProvider for HuggingFaceProvider {
    #[cfg(feature = "huggingface")]
    async fn infer(
        &self,
        request: InferenceRequest,
        config: &InferenceConfig,
    ) -> Result<InferenceResponse, ProviderError> {
        let body = request_body(&request, config);

        // Only place the token leaves its wrapper
        let response = Self::client()
            .post(self.endpoint(&request.model))
            .bearer_auth(self.token.expose())
            .timeout(config.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(config.timeout)
                } else {
                    ProviderError::HttpError(e.to_string())
                }
            })?;

        let status = response.status();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(ProviderError::RateLimited { retry_after });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::HttpError(e.to_string()))?;

        if !status.is_success() {
            return Err(parse_error(status.as_u16(), &request.model, &text));
        }

        Ok(InferenceResponse {
            text: parse_outputs(request.task, &text)?,
            model: request.model,
        })
    }

    #[cfg(not(feature = "huggingface"))]
    async fn infer(
        &self,
        _request: InferenceRequest,
        _config: &InferenceConfig,
    ) -> Result<InferenceResponse, ProviderError> {
        Err(ProviderError::NotConfigured(
            "Hugging Face provider requires 'huggingface' feature".to_string(),
        ))
    }

    async fn health_check(&self) -> bool {
        !self.token.is_empty()
    }

    fn name(&self) -> &str {
        "huggingface"
    }
}

/// Factory for [`HuggingFaceProvider`].
///
/// ```json
/// {
///   "api_token": "hf_...",        // optional, falls back to HF_API_TOKEN
///   "base_url": "https://..."     // optional
/// }
/// ```
pub struct HuggingFaceProviderFactory;

impl ProviderFactory for HuggingFaceProviderFactory {
    fn provider_type(&self) -> &'static str {
        "huggingface"
    }

    fn create(&self, config: &JsonValue) -> Result<Arc<dyn InferenceProvider>, ProviderError> {
        Ok(Arc::new(HuggingFaceProvider::from_config(config)?))
    }

    fn validate_config(&self, config: &JsonValue) -> Result<(), ProviderError> {
        if !ApiToken::is_available(config, "api_token", HF_API_TOKEN_ENV) {
            return Err(ProviderError::NotConfigured(format!(
                "{} required: set 'api_token' in config or {} env",
                TOKEN_NAME, HF_API_TOKEN_ENV
            )));
        }

        if let Some(url) = config["base_url"].as_str() {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ProviderError::NotConfigured(
                    "base_url must start with http:// or https://".to_string(),
                ));
            }
        }

        Ok(())
    }

    fn default_config(&self) -> JsonValue {
        serde_json::json!({ "base_url": DEFAULT_BASE_URL })
    }
}
