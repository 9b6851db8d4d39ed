//! Runtime configuration.
//!
//! ```yaml
//! provider:
//!   type: huggingface
//!   settings:
//!     api_token: hf_...           # optional, falls back to HF_API_TOKEN
//! question_answering:
//!   model: google/flan-t5-base
//!   max_length: 200
//! translation:
//!   model_pattern: "Helsinki-NLP/opus-mt-{src}-{tgt}"
//!   cache_capacity: 1000
//!   cache_ttl: 1h
//! collaborator_timeout: 15s
//! retry:
//!   max_retries: 2
//!   min_delay: 500ms
//! circuit_breaker:
//!   failure_threshold: 3
//!   recovery_timeout: 30s
//! outbound_fallback: passthrough
//! ```
//!
//! Durations use `humantime` syntax.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;

use crate::collaborators::{DEFAULT_QA_MODEL, DEFAULT_TRANSLATION_PATTERN};
use crate::resilience::{CircuitBreakerConfig, FallbackStrategy, RetryPolicy};
use crate::RuntimeError;

/// Which inference backend to build, by registry type name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderSettings {
    #[serde(rename = "type")]
    pub provider_type: String,

    /// Passed verbatim to the provider factory
    #[serde(default = "empty_object")]
    pub settings: JsonValue,
}

fn empty_object() -> JsonValue {
    JsonValue::Object(Default::default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuestionAnsweringConfig {
    pub model: String,
    pub max_length: u32,
}

impl Default for QuestionAnsweringConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_QA_MODEL.to_string(),
            max_length: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslationConfig {
    /// Model name with `{src}` and `{tgt}` placeholders
    pub model_pattern: String,

    pub cache_capacity: u64,

    #[serde(with = "duration_str")]
    pub cache_ttl: Duration,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            model_pattern: DEFAULT_TRANSLATION_PATTERN.to_string(),
            cache_capacity: 1_000,
            cache_ttl: Duration::from_secs(3600),
        }
    }
}

/// Configuration for the collaborator runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// No provider means English-only with no question answering
    pub provider: Option<ProviderSettings>,

    pub question_answering: QuestionAnsweringConfig,

    pub translation: TranslationConfig,

    /// Upper bound on one collaborator call, retries included
    #[serde(with = "duration_str")]
    pub collaborator_timeout: Duration,

    pub retry: RetryPolicy,

    pub circuit_breaker: CircuitBreakerConfig,

    /// What to show when the reply cannot be translated back
    pub outbound_fallback: FallbackStrategy,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            provider: None,
            question_answering: QuestionAnsweringConfig::default(),
            translation: TranslationConfig::default(),
            collaborator_timeout: Duration::from_secs(15),
            retry: RetryPolicy::default(),
            circuit_breaker: CircuitBreakerConfig::default(),
            outbound_fallback: FallbackStrategy::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, RuntimeError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Semantic checks serde cannot express.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        if self.collaborator_timeout.is_zero() {
            return Err(RuntimeError::Config(
                "collaborator_timeout must be greater than zero".to_string(),
            ));
        }
        if self.question_answering.model.trim().is_empty() {
            return Err(RuntimeError::Config(
                "question_answering.model must not be empty".to_string(),
            ));
        }
        if self.question_answering.max_length == 0 {
            return Err(RuntimeError::Config(
                "question_answering.max_length must be at least 1".to_string(),
            ));
        }
        let pattern = &self.translation.model_pattern;
        if !pattern.contains("{src}") || !pattern.contains("{tgt}") {
            return Err(RuntimeError::Config(format!(
                "translation.model_pattern '{}' must contain {{src}} and {{tgt}}",
                pattern
            )));
        }
        if self.circuit_breaker.failure_threshold == 0 || self.circuit_breaker.success_threshold == 0
        {
            return Err(RuntimeError::Config(
                "circuit_breaker thresholds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Serde adapter for `humantime` durations (`"15s"`, `"500ms"`, `"2m"`).
pub(crate) mod duration_str {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = RuntimeConfig::from_yaml("").unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert!(config.provider.is_none());
        assert_eq!(config.collaborator_timeout, Duration::from_secs(15));
        assert_eq!(config.outbound_fallback, FallbackStrategy::Passthrough);
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
provider:
  type: huggingface
  settings:
    api_token: hf_test
question_answering:
  model: google/flan-t5-large
  max_length: 120
translation:
  cache_ttl: 10m
collaborator_timeout: 5s
retry:
  max_retries: 0
outbound_fallback: apologize
"#;
        let config = RuntimeConfig::from_yaml(yaml).unwrap();

        let provider = config.provider.as_ref().unwrap();
        assert_eq!(provider.provider_type, "huggingface");
        assert_eq!(provider.settings["api_token"], "hf_test");
        assert_eq!(config.question_answering.model, "google/flan-t5-large");
        assert_eq!(config.question_answering.max_length, 120);
        assert_eq!(config.translation.cache_ttl, Duration::from_secs(600));
        assert_eq!(
            config.translation.model_pattern,
            DEFAULT_TRANSLATION_PATTERN
        );
        assert_eq!(config.collaborator_timeout, Duration::from_secs(5));
        assert_eq!(config.retry.max_retries, 0);
        assert_eq!(config.outbound_fallback, FallbackStrategy::Apologize);
    }

    #[test]
    fn test_provider_settings_default_to_empty_object() {
        let config = RuntimeConfig::from_yaml("provider:\n  type: huggingface\n").unwrap();
        assert!(config.provider.unwrap().settings.is_object());
    }

    #[test]
    fn test_rejects_unknown_fields() {
        assert!(matches!(
            RuntimeConfig::from_yaml("temperature: 0.7\n"),
            Err(RuntimeError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_rejects_bad_duration() {
        assert!(RuntimeConfig::from_yaml("collaborator_timeout: soon\n").is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        assert!(matches!(
            RuntimeConfig::from_yaml("collaborator_timeout: 0s\n"),
            Err(RuntimeError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_pattern_without_placeholders() {
        let err = RuntimeConfig::from_yaml("translation:\n  model_pattern: opus-mt\n").unwrap_err();
        assert!(err.to_string().contains("{src}"));
    }

    #[test]
    fn test_durations_serialize_human_readable() {
        let yaml = serde_yaml::to_string(&RuntimeConfig::default()).unwrap();
        assert!(yaml.contains("collaborator_timeout: 15s"));
        assert!(yaml.contains("min_delay: 500ms"));
    }
}
