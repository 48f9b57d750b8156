//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the API gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, inbound limits).
    pub listener: ListenerConfig,

    /// Prefix routes, checked in registration order.
    pub routes: Vec<RouteConfig>,

    /// Upstream client settings shared by every route.
    pub upstream: UpstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            routes: vec![
                RouteConfig {
                    name: "users".to_string(),
                    path_prefix: "/users".to_string(),
                    upstream: "http://user-service:8001".to_string(),
                    upstream_env: Some("USER_SERVICE_URL".to_string()),
                },
                RouteConfig {
                    name: "orders".to_string(),
                    path_prefix: "/orders".to_string(),
                    upstream: "http://order-service:8002".to_string(),
                    upstream_env: Some("ORDER_SERVICE_URL".to_string()),
                },
            ],
            upstream: UpstreamConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Deadline for handling one inbound request end to end, in seconds.
    pub request_timeout_secs: u64,

    /// Largest request body the gateway will buffer.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            request_timeout_secs: 60,
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

/// A prefix route: requests whose path starts with `path_prefix` go to `upstream`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier for logging/metrics.
    pub name: String,

    /// Path prefix to match (case-sensitive, includes the leading slash).
    pub path_prefix: String,

    /// Upstream base URL, e.g. "http://user-service:8001".
    pub upstream: String,

    /// Environment variable that overrides `upstream` when set.
    #[serde(default)]
    pub upstream_env: Option<String>,
}

/// Upstream client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Total deadline for one upstream exchange, response body included.
    pub request_timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Redirects followed before giving up. 0 returns 3xx responses as-is.
    pub max_redirects: usize,

    /// How long an idle pooled connection is kept.
    pub pool_idle_timeout_secs: u64,

    /// Idle connections kept per upstream host.
    pub pool_max_idle_per_host: usize,

    /// Stamp X-Forwarded-For/-Host/-Proto on forwarded requests.
    pub forwarded_headers: bool,
}

impl UpstreamConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn pool_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_idle_timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            max_redirects: 5,
            pool_idle_timeout_secs: 90,
            pool_max_idle_per_host: 32,
            forwarded_headers: true,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
