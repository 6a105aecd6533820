//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid environment variable {name}: {reason}")]
    Env { name: &'static str, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GatewayConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides using `lookup` to read variables.
///
/// Recognized: `PORT`, `APP_ENV`, `DATABASE_URL`, `LOG_LEVEL`.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT") {
        config.listener.port = port.trim().parse().map_err(|_| ConfigError::Env {
            name: "PORT",
            reason: format!("'{}' is not a valid port", port),
        })?;
    }

    if let Some(environment) = lookup("APP_ENV").filter(|v| !v.is_empty()) {
        config.environment = environment;
    }

    if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
        config.database.url = Some(url);
    }

    if let Some(level) = lookup("LOG_LEVEL").filter(|v| !v.is_empty()) {
        config.observability.log_level = level;
    }

    Ok(())
}

impl GatewayConfig {
    /// Build the effective configuration: optional file, then environment.
    pub fn from_env_and_file(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => load_config(path)?,
            None => GatewayConfig::default(),
        };

        apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
        validate_config(&config).map_err(ConfigError::Validation)?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let mut config = GatewayConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("PORT", "3000"),
                ("APP_ENV", "production"),
                ("DATABASE_URL", "postgres://ocr@db/ocr"),
            ]),
        )
        .unwrap();

        assert_eq!(config.listener.port, 3000);
        assert_eq!(config.environment, "production");
        assert_eq!(config.database.url.as_deref(), Some("postgres://ocr@db/ocr"));
    }

    #[test]
    fn test_missing_env_keeps_defaults() {
        let mut config = GatewayConfig::default();
        apply_env_overrides(&mut config, env(&[])).unwrap();
        assert_eq!(config.listener.port, 8080);
        assert_eq!(config.environment, "development");
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let mut config = GatewayConfig::default();
        let err = apply_env_overrides(&mut config, env(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { name: "PORT", .. }));
    }

    #[test]
    fn test_load_config_file() {
        let path = std::env::temp_dir().join(format!("ocr-gateway-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "[uploads]\nmax_file_size = 0\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref e) if e.len() == 1));

        fs::write(&path, "[uploads]\nfield_name = \"file\"\n").unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.uploads.field_name, "file");

        fs::remove_file(&path).unwrap_or_default();
    }
}
