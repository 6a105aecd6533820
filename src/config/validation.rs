//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and cross-field
//! consistency. Every violation is reported, not just the first one.

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::GatewayConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Uploads larger than this cannot be configured.
const MAX_CONFIGURABLE_UPLOAD: usize = 1024 * 1024 * 1024;

/// A single semantic violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Validate a deserialized configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.uploads.max_file_size == 0 {
        errors.push(ValidationError::new("uploads.max_file_size", "must be greater than zero"));
    } else if config.uploads.max_file_size > MAX_CONFIGURABLE_UPLOAD {
        errors.push(ValidationError::new(
            "uploads.max_file_size",
            format!("must not exceed {} bytes", MAX_CONFIGURABLE_UPLOAD),
        ));
    }

    if config.uploads.field_name.trim().is_empty() {
        errors.push(ValidationError::new("uploads.field_name", "must not be empty"));
    }

    if config.ocr.binary.trim().is_empty() {
        errors.push(ValidationError::new("ocr.binary", "must not be empty"));
    }

    if config.ocr.timeout_secs == 0 {
        errors.push(ValidationError::new("ocr.timeout_secs", "must be greater than zero"));
    }

    if config.database.max_connections == 0 {
        errors.push(ValidationError::new("database.max_connections", "must be greater than zero"));
    }

    if config.shutdown.drain_timeout_secs == 0 {
        errors.push(ValidationError::new("shutdown.drain_timeout_secs", "must be greater than zero"));
    }

    if config.logs.default_limit == 0 {
        errors.push(ValidationError::new("logs.default_limit", "must be greater than zero"));
    }

    if config.logs.default_limit > config.logs.max_limit {
        errors.push(ValidationError::new(
            "logs.default_limit",
            format!("must not exceed logs.max_limit ({})", config.logs.max_limit),
        ));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
