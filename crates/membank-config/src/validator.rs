//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::{Config, DISTANCE_METRICS, EMBEDDING_PROVIDERS};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Convert the first error into a [`ConfigError`], if any.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_storage(config, &mut result);
        Self::validate_search(config, &mut result);
        Self::validate_embedding(config, &mut result);

        Ok(result)
    }

    fn validate_storage(config: &Config, result: &mut ValidationResult) {
        if config.storage.path.as_os_str().is_empty() {
            result.add_error(ValidationError::new(
                "storage.path",
                "Storage path cannot be empty",
            ));
        }
    }

    fn validate_search(config: &Config, result: &mut ValidationResult) {
        let search = &config.search;

        if search.top_k == 0 {
            result.add_error(ValidationError::new(
                "search.top_k",
                "top_k must be greater than 0",
            ));
        }

        if search.rrf_k == 0 {
            result.add_error(ValidationError::new(
                "search.rrf_k",
                "rrf_k must be greater than 0",
            ));
        }

        if search.fetch_multiplier == 0 {
            result.add_error(ValidationError::new(
                "search.fetch_multiplier",
                "fetch_multiplier must be greater than 0",
            ));
        }

        if !(0.0..=1.0).contains(&search.threshold) {
            result.add_error(ValidationError::new(
                "search.threshold",
                format!("threshold must be within [0.0, 1.0], got {}", search.threshold),
            ));
        } else if search.threshold == 0.0 {
            result.add_warning(ValidationWarning::new(
                "search.threshold",
                "threshold is 0.0, every vector hit will be kept",
            ));
        }
    }

    fn validate_embedding(config: &Config, result: &mut ValidationResult) {
        let embedding = &config.embedding;

        if !EMBEDDING_PROVIDERS.contains(&embedding.provider.as_str()) {
            result.add_error(ValidationError::new(
                "embedding.provider",
                format!(
                    "Unknown embedding provider '{}', valid values: {:?}",
                    embedding.provider, EMBEDDING_PROVIDERS
                ),
            ));
        }

        // Parsing the metric is case-insensitive.
        let metric = embedding.metric.to_ascii_lowercase();
        if !DISTANCE_METRICS.contains(&metric.as_str()) {
            result.add_error(ValidationError::new(
                "embedding.metric",
                format!(
                    "Unknown distance metric '{}', valid values: {:?}",
                    embedding.metric, DISTANCE_METRICS
                ),
            ));
        }

        if embedding.dimension == 0 {
            result.add_error(ValidationError::new(
                "embedding.dimension",
                "dimension must be greater than 0",
            ));
        }

        if embedding.provider == "openai" {
            if embedding.api_key.as_deref().unwrap_or("").is_empty() {
                result.add_error(ValidationError::new(
                    "embedding.api_key",
                    "api_key is required for the openai provider",
                ));
            }

            if !embedding.base_url.starts_with("http://")
                && !embedding.base_url.starts_with("https://")
            {
                result.add_error(ValidationError::new(
                    "embedding.base_url",
                    "base_url must start with http:// or https://",
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
