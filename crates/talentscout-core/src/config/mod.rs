//! Screening configuration.
//!
//! Configs are plain YAML or JSON validated against an embedded JSON Schema
//! before they are deserialized.

mod parser;
mod schema;

pub use parser::{ConfigError, ScreeningConfig};
pub use schema::validate_screening_schema;
