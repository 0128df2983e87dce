//! Configuration validation
//!
//! Validates corkboard configuration for correctness:
//! - API base URL uses http or https
//! - Timeouts are non-zero
//! - Retry policies allow at least one attempt

use super::corkboard_config::{CorkboardConfig, RetrySettings};
use crate::CorkboardError;

/// Validation error details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub section: Option<String>,
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            section: None,
            field: field.into(),
            message: message.into(),
        }
    }

    fn in_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref section) = self.section {
            write!(f, "{}.{}: {}", section, self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

/// Validation result
pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

/// Validate a corkboard configuration
pub fn validate_config(config: &CorkboardConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if !is_valid_base_url(&config.api.base_url) {
        errors.push(
            ValidationError::new(
                "base_url",
                format!("Invalid API URL: {}", config.api.base_url),
            )
            .in_section("api"),
        );
    }

    if config.api.timeout_secs == 0 {
        errors.push(
            ValidationError::new("timeout_secs", "Timeout must be greater than 0")
                .in_section("api"),
        );
    }

    errors.extend(validate_retry("retry", &config.retry));
    errors.extend(validate_retry("drag_retry", &config.drag_retry));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_retry(section: &str, retry: &RetrySettings) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if retry.max_attempts == 0 {
        errors.push(
            ValidationError::new("max_attempts", "At least one attempt is required")
                .in_section(section),
        );
    }

    // Anything past a minute per step makes a drag feel hung
    if retry.delay_ms > 60_000 {
        tracing::warn!(
            section = section,
            delay_ms = retry.delay_ms,
            "Retry delay is unusually long"
        );
    }

    errors
}

/// Check if a string looks like an http(s) base URL
fn is_valid_base_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));

    matches!(rest, Some(host) if !host.is_empty() && !host.starts_with('/'))
}

/// Validate configuration and return a Result
pub fn validate_config_result(config: &CorkboardConfig) -> crate::Result<()> {
    validate_config(config).map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        CorkboardError::Config(format!(
            "Configuration validation failed:\n  - {}",
            messages.join("\n  - ")
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&CorkboardConfig::new()).is_ok());
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = CorkboardConfig::new();
        config.api.base_url = "localhost:3000".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].section.as_deref(), Some("api"));
        assert!(errors[0].message.contains("Invalid API URL"));
    }

    #[test]
    fn test_valid_base_urls() {
        assert!(is_valid_base_url("http://localhost:3000"));
        assert!(is_valid_base_url("https://boards.example.com/"));
        assert!(!is_valid_base_url("https://"));
        assert!(!is_valid_base_url("ftp://example.com"));
        assert!(!is_valid_base_url(""));
    }

    #[test]
    fn test_zero_attempts_and_timeout() {
        let mut config = CorkboardConfig::new();
        config.api.timeout_secs = 0;
        config.drag_retry.max_attempts = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.to_string().starts_with("drag_retry.max_attempts")));
    }

    #[test]
    fn test_validate_config_result_message() {
        let mut config = CorkboardConfig::new();
        config.retry.max_attempts = 0;

        let err = validate_config_result(&config).unwrap_err();
        assert!(err.to_string().contains("retry.max_attempts"));
    }
}
