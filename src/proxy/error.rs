//! Per-request failure taxonomy.
//!
//! Every variant maps to exactly one caller-facing status code. None of them
//! escape the gateway handler: they are rendered as a small JSON body and the
//! underlying cause is only ever logged.

use std::error::Error as StdError;
use std::time::Duration;

use axum::http::StatusCode;

/// Errors raised while handling a single inbound request.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("no route matches path '{0}'")]
    RouteNotFound(String),

    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("failed to read request body: {0}")]
    InvalidRequestBody(String),

    #[error("invalid upstream URL '{url}': {reason}")]
    InvalidUpstreamUrl { url: String, reason: String },

    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(#[source] reqwest::Error),

    #[error("upstream did not answer within {0:?}")]
    UpstreamTimeout(Duration),

    #[error("malformed upstream response: {0}")]
    UpstreamMalformedResponse(#[source] reqwest::Error),

    #[error("upstream redirect limit reached: {0}")]
    TooManyRedirects(#[source] reqwest::Error),
}

impl GatewayError {
    /// Classify a transport error from the upstream client.
    ///
    /// Timeouts are checked first: reqwest reports a deadline hit while reading
    /// the body as both a body error and a timeout.
    pub fn from_upstream(err: reqwest::Error, deadline: Duration) -> Self {
        if err.is_timeout() {
            GatewayError::UpstreamTimeout(deadline)
        } else if err.is_redirect() {
            GatewayError::TooManyRedirects(err)
        } else if err.is_body() || err.is_decode() || is_protocol_error(&err) {
            GatewayError::UpstreamMalformedResponse(err)
        } else {
            GatewayError::UpstreamUnreachable(err)
        }
    }

    /// Status code returned to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            GatewayError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::InvalidUpstreamUrl { .. }
            | GatewayError::UpstreamUnreachable(_)
            | GatewayError::UpstreamMalformedResponse(_)
            | GatewayError::TooManyRedirects(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::RouteNotFound(_) => "route_not_found",
            GatewayError::PayloadTooLarge { .. } => "payload_too_large",
            GatewayError::InvalidRequestBody(_) => "invalid_request_body",
            GatewayError::InvalidUpstreamUrl { .. } => "invalid_upstream_url",
            GatewayError::UpstreamUnreachable(_) => "upstream_unreachable",
            GatewayError::UpstreamTimeout(_) => "upstream_timeout",
            GatewayError::UpstreamMalformedResponse(_) => "upstream_malformed_response",
            GatewayError::TooManyRedirects(_) => "too_many_redirects",
        }
    }

    /// Message safe to show the caller.
    pub fn public_message(&self) -> &'static str {
        match self {
            GatewayError::RouteNotFound(_) => "route not found",
            GatewayError::PayloadTooLarge { .. } => "payload too large",
            GatewayError::InvalidRequestBody(_) => "invalid request body",
            GatewayError::UpstreamTimeout(_) => "upstream timeout",
            GatewayError::UpstreamMalformedResponse(_) => "bad upstream response",
            GatewayError::TooManyRedirects(_) => "too many upstream redirects",
            GatewayError::InvalidUpstreamUrl { .. } | GatewayError::UpstreamUnreachable(_) => {
                "upstream unavailable"
            }
        }
    }
}

/// Looks for an HTTP framing error from hyper anywhere in the source chain.
fn is_protocol_error(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(hyper_err) = e.downcast_ref::<hyper::Error>() {
            if hyper_err.is_parse() || hyper_err.is_parse_status() || hyper_err.is_incomplete_message() {
                return true;
            }
        }
        current = e.source();
    }
    false
}
