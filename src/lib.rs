//! Prefix-routing API gateway library.
//!
//! Requests whose path starts with a configured prefix are forwarded, method,
//! headers, query and body intact, to that prefix's upstream base URL; the
//! upstream's answer is relayed back verbatim.

// Core subsystems
pub mod config;
pub mod http;
pub mod proxy;
pub mod routing;

// Cross-cutting concerns
pub mod error;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod security;

pub use config::schema::GatewayConfig;
pub use error::Error;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
