//! Request forwarding to upstream services.
//!
//! # Responsibilities
//! - Build the outbound request from the inbound one and the matched route
//! - Perform exactly one upstream exchange under the configured deadline
//! - Relay status, filtered headers and body verbatim
//! - Turn every transport failure into a well-formed response
//!
//! # Design Decisions
//! - One `reqwest::Client` (and its connection pool) shared by all requests;
//!   it is internally reference counted and safe to use concurrently
//! - No retries: a failed attempt is reported, not replayed
//! - If the caller disconnects, the server drops this future and the in-flight
//!   upstream request is aborted with it
//!
//! Per call the exchange moves `Building → Sent → Received | Failed → Responded`.

use std::fmt;
use std::time::Instant;

use crate::config::UpstreamConfig;
use crate::http::response::GatewayResponse;
use crate::observability::metrics;
use crate::proxy::error::GatewayError;
use crate::proxy::request::{InboundRequest, OutboundRequest};
use crate::proxy::response::UpstreamResponse;
use crate::resilience::{redirect_policy, TimeoutPolicy};
use crate::routing::RouteMatch;

/// Where a forwarding attempt stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Building,
    Sent,
    Received,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Building => "building",
            Phase::Sent => "sent",
            Phase::Received => "received",
        };
        f.write_str(s)
    }
}

/// Forwards buffered requests to upstream base URLs.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    timeouts: TimeoutPolicy,
    forwarded_headers: bool,
}

impl Forwarder {
    /// Build the shared upstream client.
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let timeouts = TimeoutPolicy::from_config(config);

        let builder = reqwest::Client::builder()
            .redirect(redirect_policy(config.max_redirects))
            .pool_idle_timeout(config.pool_idle_timeout())
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .no_proxy();
        let client = timeouts.apply(builder).build()?;

        Ok(Self {
            client,
            timeouts,
            forwarded_headers: config.forwarded_headers,
        })
    }

    /// Forward `inbound` to the matched route's `upstream_base_url + rewritten_path`.
    ///
    /// Always produces a response; failures become 502/504 with a JSON body.
    pub async fn forward(&self, inbound: &InboundRequest, route: RouteMatch<'_>) -> GatewayResponse {
        let start = Instant::now();
        let upstream_base_url = route.upstream_base_url;
        let rewritten_path = route.rewritten_path;

        match self.try_forward(inbound, upstream_base_url, rewritten_path).await {
            Ok(upstream) => {
                tracing::debug!(
                    upstream = %upstream_base_url,
                    status = upstream.status.as_u16(),
                    bytes = upstream.body.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Upstream responded"
                );
                GatewayResponse::from_upstream(upstream)
            }
            Err((phase, err)) => {
                tracing::warn!(
                    route = %route.name,
                    upstream = %upstream_base_url,
                    path = %rewritten_path,
                    phase = %phase,
                    kind = err.kind(),
                    error = %err,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Upstream request failed"
                );
                metrics::record_upstream_failure(err.kind(), route.name);
                GatewayResponse::from_error(&err)
            }
        }
    }

    /// One attempt, reporting the phase it failed in.
    pub async fn try_forward(
        &self,
        inbound: &InboundRequest,
        upstream_base_url: &str,
        rewritten_path: &str,
    ) -> Result<UpstreamResponse, (Phase, GatewayError)> {
        let mut outbound = OutboundRequest::build(inbound, upstream_base_url, rewritten_path)
            .map_err(|err| (Phase::Building, err))?;
        if self.forwarded_headers {
            outbound.stamp_forwarded(inbound);
        }

        tracing::debug!(
            method = %outbound.method,
            url = %outbound.url,
            query_params = inbound.query_pairs().len(),
            "Forwarding request"
        );

        let mut request = self
            .client
            .request(outbound.method, outbound.url)
            .headers(outbound.headers);
        if !outbound.body.is_empty() {
            request = request.body(outbound.body);
        }

        let deadline = self.timeouts.request;
        let response = request
            .send()
            .await
            .map_err(|err| (Phase::Sent, GatewayError::from_upstream(err, deadline)))?;

        UpstreamResponse::read(response)
            .await
            .map_err(|err| (Phase::Received, GatewayError::from_upstream(err, deadline)))
    }
}
