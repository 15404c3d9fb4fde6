//! Configuration validation.
//!
//! Serde handles syntax; this pass checks values. All errors are collected
//! so the operator sees every problem in one run.

use thiserror::Error;

use crate::config::schema::AppConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid URL '{value}': {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{field}: unsupported URL scheme '{scheme}' (expected http or https)")]
    UnsupportedScheme { field: &'static str, scheme: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("explorer.cluster must not be empty")]
    EmptyCluster,

    #[error("observability.log_level: unknown level '{0}'")]
    UnknownLogLevel(String),
}

/// Validate a configuration, returning every error found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = check_http_url("rpc.url", &config.rpc.url) {
        errors.push(e);
    }
    if config.rpc.timeout_secs == 0 {
        errors.push(ValidationError::Zero("rpc.timeout_secs"));
    }
    if config.confirmation.poll_interval_ms == 0 {
        errors.push(ValidationError::Zero("confirmation.poll_interval_ms"));
    }
    if let Err(e) = check_http_url("explorer.base_url", &config.explorer.base_url) {
        errors.push(e);
    }
    if matches!(config.explorer.cluster.as_deref(), Some(c) if c.trim().is_empty()) {
        errors.push(ValidationError::EmptyCluster);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check that `value` parses as an http(s) URL.
pub fn check_http_url(field: &'static str, value: &str) -> Result<url::Url, ValidationError> {
    let url = url::Url::parse(value).map_err(|e| ValidationError::InvalidUrl {
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ValidationError::UnsupportedScheme {
            field,
            scheme: other.to_string(),
        }),
    }
}
