//! Screening config parsing from YAML/JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::schema::validate_screening_schema;

/// Errors that can occur when loading screening config.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Config does not match schema: {}", .0.join("; "))]
    SchemaViolation(Vec<String>),

    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

fn default_points_per_answer() -> u32 {
    3
}

fn default_max_points_per_question() -> u32 {
    5
}

/// Scoring parameters for the interview stage.
///
/// Every answered question earns `points_per_answer`, whatever the answer
/// says. The completion summary reports the total out of
/// `questions × max_points_per_question`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScreeningConfig {
    #[serde(default = "default_points_per_answer")]
    pub points_per_answer: u32,

    #[serde(default = "default_max_points_per_question")]
    pub max_points_per_question: u32,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            points_per_answer: default_points_per_answer(),
            max_points_per_question: default_max_points_per_question(),
        }
    }
}

impl ScreeningConfig {
    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Self::from_value(serde_json::Value::Null);
        }
        let value: serde_json::Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Parse config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse config from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse config from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Build config from an already-parsed JSON value.
    ///
    /// A `null` value (an empty YAML document or section) yields defaults.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        let value = if value.is_null() {
            serde_json::json!({})
        } else {
            value
        };

        validate_screening_schema(&value).map_err(ConfigError::SchemaViolation)?;

        let config: ScreeningConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.points_per_answer > self.max_points_per_question {
            return Err(ConfigError::ValidationError(format!(
                "points_per_answer ({}) exceeds max_points_per_question ({})",
                self.points_per_answer, self.max_points_per_question
            )));
        }

        Ok(())
    }

    /// Highest reachable score for an interview of `question_count` questions.
    pub fn max_score(&self, question_count: usize) -> u64 {
        question_count as u64 * u64::from(self.max_points_per_question)
    }
}
