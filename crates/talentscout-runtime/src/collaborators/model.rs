//! Collaborators backed by an [`InferenceProvider`].

use async_trait::async_trait;
use std::sync::Arc;
use talentscout_core::Language;

use super::{CollaboratorError, QuestionAnswerer, Translator};
use crate::cache::{TranslationCache, TranslationKey};
use crate::providers::{InferenceConfig, InferenceProvider, InferenceRequest};
use crate::resilience::RetryPolicy;

/// Question-answering model used when none is configured.
pub const DEFAULT_QA_MODEL: &str = "google/flan-t5-base";

/// Translation model name, with `{src}` and `{tgt}` replaced by language
/// codes.
pub const DEFAULT_TRANSLATION_PATTERN: &str = "Helsinki-NLP/opus-mt-{src}-{tgt}";

/// Translator that picks a model per language pair.
pub struct ModelTranslator {
    provider: Arc<dyn InferenceProvider>,
    model_pattern: String,
    inference: InferenceConfig,
    retry: RetryPolicy,
    cache: Arc<TranslationCache>,
}

impl ModelTranslator {
    pub fn new(provider: Arc<dyn InferenceProvider>) -> Self {
        Self {
            provider,
            model_pattern: DEFAULT_TRANSLATION_PATTERN.to_string(),
            inference: InferenceConfig::default(),
            retry: RetryPolicy::default(),
            cache: Arc::new(TranslationCache::default()),
        }
    }

    pub fn with_model_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.model_pattern = pattern.into();
        self
    }

    pub fn with_inference_config(mut self, inference: InferenceConfig) -> Self {
        self.inference = inference;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_cache(mut self, cache: Arc<TranslationCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Model name for one direction, e.g. `Helsinki-NLP/opus-mt-ta-en`.
    pub fn model_for(&self, source: Language, target: Language) -> String {
        self.model_pattern
            .replace("{src}", source.code())
            .replace("{tgt}", target.code())
    }
}

#[async_trait]
impl Translator for ModelTranslator {
    async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, CollaboratorError> {
        if source == target {
            return Ok(text.to_string());
        }

        let key = TranslationKey::new(source, target, text);
        if let Some(hit) = self.cache.get(&key).await {
            tracing::trace!(source = %source, target = %target, "Translation cache hit");
            return Ok(hit);
        }

        let request = InferenceRequest::translation(self.model_for(source, target), text);
        let response = self
            .retry
            .run(|| self.provider.infer(request.clone(), &self.inference))
            .await?;

        self.cache.insert(key, response.text.clone()).await;
        Ok(response.text)
    }
}

/// Question answerer backed by a text-to-text model.
pub struct ModelAnswerer {
    provider: Arc<dyn InferenceProvider>,
    model: String,
    max_length: u32,
    inference: InferenceConfig,
    retry: RetryPolicy,
}

impl ModelAnswerer {
    pub fn new(provider: Arc<dyn InferenceProvider>) -> Self {
        Self {
            provider,
            model: DEFAULT_QA_MODEL.to_string(),
            max_length: 200,
            inference: InferenceConfig::default(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>, max_length: u32) -> Self {
        self.model = model.into();
        self.max_length = max_length;
        self
    }

    pub fn with_inference_config(mut self, inference: InferenceConfig) -> Self {
        self.inference = inference;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[async_trait]
impl QuestionAnswerer for ModelAnswerer {
    async fn answer(&self, prompt: &str) -> Result<String, CollaboratorError> {
        let request = InferenceRequest::text2text(&self.model, prompt, self.max_length);
        let response = self
            .retry
            .run(|| self.provider.infer(request.clone(), &self.inference))
            .await?;

        Ok(response.text)
    }
}
