//! Configuration loading from disk and environment.

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

/// Load, resolve and validate configuration.
///
/// Starts from the TOML file at `path` (or the built-in defaults), then applies
/// environment overrides for route upstreams.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let config = match path {
        Some(path) => parse_config(&fs::read_to_string(path)?)?,
        None => GatewayConfig::default(),
    };

    resolve(config, |var| std::env::var(var).ok())
}

/// Parse a TOML document without resolving or validating it.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Apply environment overrides through `lookup`, normalize, then validate.
pub fn resolve<F>(mut config: GatewayConfig, lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    for route in &mut config.routes {
        if let Some(value) = route.upstream_env.as_deref().and_then(&lookup) {
            let value = value.trim();
            if !value.is_empty() {
                tracing::debug!(route = %route.name, upstream = %value, "Upstream overridden from environment");
                route.upstream = value.to_string();
            }
        }

        // base + "/path" must not produce "//path"
        let trimmed = route.upstream.trim_end_matches('/').len();
        route.upstream.truncate(trimmed);
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
