//! JSON Schema validation for screening configuration.
//!
//! The schema is embedded at compile time from `schema/screening.schema.json`
//! and compiled once on first use.

use std::sync::OnceLock;
use thiserror::Error;

/// Embedded screening config schema.
const SCREENING_SCHEMA_JSON: &str = include_str!("../../schema/screening.schema.json");

/// Compiled JSON Schema validator (initialized once, reused).
static COMPILED_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

/// Errors from schema validation.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to load schema: {0}")]
    LoadError(String),
}

fn get_validator() -> Result<&'static jsonschema::Validator, SchemaError> {
    let result = COMPILED_SCHEMA.get_or_init(|| {
        let schema_value: serde_json::Value = match serde_json::from_str(SCREENING_SCHEMA_JSON) {
            Ok(v) => v,
            Err(e) => return Err(format!("Invalid schema JSON: {}", e)),
        };

        match jsonschema::options().build(&schema_value) {
            Ok(v) => Ok(v),
            Err(e) => Err(format!("Failed to compile schema: {}", e)),
        }
    });

    match result {
        Ok(v) => Ok(v),
        Err(e) => Err(SchemaError::LoadError(e.clone())),
    }
}

/// Validate a screening config value against the schema.
///
/// Returns every violation as `"<message> at <instance path>"`.
pub fn validate_screening_schema(config_json: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator = get_validator().map_err(|e| vec![e.to_string()])?;

    let errors: Vec<String> = validator
        .iter_errors(config_json)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_passes() {
        assert!(validate_screening_schema(&serde_json::json!({})).is_ok());
    }

    #[test]
    fn test_full_config_passes() {
        let value = serde_json::json!({
            "points_per_answer": 3,
            "max_points_per_question": 5
        });
        assert!(validate_screening_schema(&value).is_ok());
    }

    #[test]
    fn test_zero_points_fails() {
        let value = serde_json::json!({ "points_per_answer": 0 });
        let errors = validate_screening_schema(&value).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("points_per_answer"));
    }

    #[test]
    fn test_wrong_type_fails() {
        let value = serde_json::json!({ "max_points_per_question": "five" });
        assert!(validate_screening_schema(&value).is_err());
    }

    #[test]
    fn test_additional_properties_fail() {
        let value = serde_json::json!({
            "points_per_answer": 3,
            "grading": "strict"
        });
        assert!(validate_screening_schema(&value).is_err());
    }
}
