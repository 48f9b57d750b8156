//! Timeout enforcement.
//!
//! # Responsibilities
//! - Bound every upstream exchange with a total deadline
//! - Bound connection establishment separately
//!
//! # Design Decisions
//! - Deadlines are enforced by the client itself, so dropping the request future
//!   (caller went away) and hitting the deadline both abort the exchange
//! - The total deadline covers reading the response body too
//! - Timeout errors are distinct from other errors and surface as 504

use std::time::Duration;

use crate::config::UpstreamConfig;

/// Deadlines applied to upstream calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutPolicy {
    pub connect: Duration,
    pub request: Duration,
}

impl TimeoutPolicy {
    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self {
            connect: config.connect_timeout(),
            request: config.request_timeout(),
        }
    }

    /// Install both deadlines on a client builder.
    pub fn apply(&self, builder: reqwest::ClientBuilder) -> reqwest::ClientBuilder {
        builder.connect_timeout(self.connect).timeout(self.request)
    }
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self::from_config(&UpstreamConfig::default())
    }
}
