//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate upstream base URLs
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect conflicting routes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashMap;
use std::net::SocketAddr;

use url::Url;

use crate::config::schema::GatewayConfig;

/// Upper bound on the configurable redirect cap.
pub const MAX_REDIRECTS_LIMIT: usize = 20;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("no routes configured")]
    NoRoutes,

    #[error("route #{index} has an empty name")]
    EmptyRouteName { index: usize },

    #[error("route '{route}': path prefix '{prefix}' must start with '/'")]
    PrefixNotAbsolute { route: String, prefix: String },

    #[error("route '{route}': path prefix '{prefix}' is already used by route '{existing}'")]
    DuplicatePrefix {
        route: String,
        prefix: String,
        existing: String,
    },

    #[error("route '{route}': invalid upstream URL '{url}': {reason}")]
    InvalidUpstream {
        route: String,
        url: String,
        reason: String,
    },

    #[error("{field} must be greater than zero")]
    ZeroValue { field: &'static str },

    #[error("listener.request_timeout_secs ({inbound}) must exceed upstream.request_timeout_secs ({upstream})")]
    InboundDeadlineTooShort { inbound: u64, upstream: u64 },

    #[error("upstream.max_redirects ({0}) exceeds the limit of {limit}", limit = MAX_REDIRECTS_LIMIT)]
    TooManyRedirects(usize),

    #[error("{field}: '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_routes(config, &mut errors);

    let listener = &config.listener;
    let upstream = &config.upstream;

    if listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: listener.bind_address.clone(),
        });
    }
    if listener.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroValue { field: "listener.max_body_bytes" });
    }
    if listener.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue { field: "listener.request_timeout_secs" });
    }
    if upstream.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue { field: "upstream.request_timeout_secs" });
    }
    if upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue { field: "upstream.connect_timeout_secs" });
    }
    if listener.request_timeout_secs > 0
        && upstream.request_timeout_secs > 0
        && listener.request_timeout_secs <= upstream.request_timeout_secs
    {
        errors.push(ValidationError::InboundDeadlineTooShort {
            inbound: listener.request_timeout_secs,
            upstream: upstream.request_timeout_secs,
        });
    }
    if upstream.max_redirects > MAX_REDIRECTS_LIMIT {
        errors.push(ValidationError::TooManyRedirects(upstream.max_redirects));
    }

    let observability = &config.observability;
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_routes(config: &GatewayConfig, errors: &mut Vec<ValidationError>) {
    if config.routes.is_empty() {
        errors.push(ValidationError::NoRoutes);
        return;
    }

    // prefix -> first route that registered it
    let mut owners: HashMap<&str, &str> = HashMap::with_capacity(config.routes.len());

    for (index, route) in config.routes.iter().enumerate() {
        if route.name.trim().is_empty() {
            errors.push(ValidationError::EmptyRouteName { index });
        }

        if !route.path_prefix.starts_with('/') {
            errors.push(ValidationError::PrefixNotAbsolute {
                route: route.name.clone(),
                prefix: route.path_prefix.clone(),
            });
        }

        if let Some(existing) = owners.get(route.path_prefix.as_str()) {
            errors.push(ValidationError::DuplicatePrefix {
                route: route.name.clone(),
                prefix: route.path_prefix.clone(),
                existing: existing.to_string(),
            });
        } else {
            owners.insert(route.path_prefix.as_str(), route.name.as_str());
        }

        if let Err(reason) = check_upstream_url(&route.upstream) {
            errors.push(ValidationError::InvalidUpstream {
                route: route.name.clone(),
                url: route.upstream.clone(),
                reason,
            });
        }
    }
}

/// An upstream must be an absolute http(s) base URL with nothing after the path.
fn check_upstream_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("query and fragment are not allowed".to_string());
    }
    Ok(())
}
