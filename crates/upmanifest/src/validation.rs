//! Build configuration validation.

use crate::schema;
use jsonschema::JSONSchema;
use serde_json::Value;
use thiserror::Error;
use upmanifest_common::Result;

/// A problem that prevents the configuration from being used.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Schema validation failed: {0}")]
    Schema(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid rule: {0}")]
    Rule(String),
}

/// Result of configuration validation.
#[derive(Debug)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.valid = false;
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// All errors on one line, `; ` separated.
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate a raw configuration document against the JSON schema.
pub fn validate_config_value(config: &Value) -> Result<ValidationResult> {
    let mut result = ValidationResult::new();

    let schema_value = schema::build_config_schema();
    let compiled = JSONSchema::compile(&schema_value)
        .map_err(|e| upmanifest_common::Error::Config(e.to_string()))?;

    if let Err(errors) = compiled.validate(config) {
        for error in errors {
            result.add_error(ValidationError::Schema(format!(
                "{} at {}",
                error, error.instance_path
            )));
        }
    }

    Ok(result)
}
