//! Inbound and outbound request models.
//!
//! # Responsibilities
//! - Buffer the inbound request once, bounded by the configured body limit
//! - Derive the outbound request: URL, filtered headers, same method and body
//!
//! # Design Decisions
//! - The query string is kept raw so order, repetition and encoding survive untouched
//! - Bodies are opaque `Bytes`; cloning shares the buffer
//! - Outbound requests are built fresh per call and never shared

use std::error::Error as StdError;
use std::net::SocketAddr;

use axum::body::{Body, Bytes};
use axum::extract::ConnectInfo;
use axum::http::{header, HeaderMap, Method, Request};
use reqwest::Url;

use crate::proxy::error::GatewayError;
use crate::security::headers::{append_forwarded, filter_request_headers};

/// A fully buffered request as received from the caller.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub path: String,
    /// Raw query string without the leading `?`.
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Peer address, when the server was started with connect info.
    pub client_addr: Option<SocketAddr>,
}

impl InboundRequest {
    /// Buffer an axum request, refusing bodies larger than `max_body_bytes`.
    pub async fn from_http(request: Request<Body>, max_body_bytes: usize) -> Result<Self, GatewayError> {
        let (parts, body) = request.into_parts();

        let declared = parts
            .headers
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<usize>().ok());
        if declared.is_some_and(|len| len > max_body_bytes) {
            return Err(GatewayError::PayloadTooLarge { limit: max_body_bytes });
        }

        let body = axum::body::to_bytes(body, max_body_bytes)
            .await
            .map_err(|err| body_error(err, max_body_bytes))?;

        let client_addr = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Ok(Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
            headers: parts.headers,
            body,
            client_addr,
        })
    }

    /// Decoded query parameters in the order they were sent.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query
            .as_deref()
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// The body stream only fails on its own when the client side broke; anything
/// else coming out of `to_bytes` is the length limit.
fn body_error(err: axum::Error, limit: usize) -> GatewayError {
    let mut current: Option<&(dyn StdError + 'static)> = Some(&err);
    while let Some(e) = current {
        if e.downcast_ref::<hyper::Error>().is_some() {
            return GatewayError::InvalidRequestBody(err.to_string());
        }
        current = e.source();
    }
    GatewayError::PayloadTooLarge { limit }
}

/// The request sent to the upstream.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl OutboundRequest {
    /// `upstream_base_url + rewritten_path`, plus the inbound query verbatim.
    pub fn build(
        inbound: &InboundRequest,
        upstream_base_url: &str,
        rewritten_path: &str,
    ) -> Result<Self, GatewayError> {
        let query_len = inbound.query.as_ref().map_or(0, |q| q.len() + 1);
        let mut raw = String::with_capacity(upstream_base_url.len() + rewritten_path.len() + query_len);
        raw.push_str(upstream_base_url);
        raw.push_str(rewritten_path);
        if let Some(query) = &inbound.query {
            raw.push('?');
            raw.push_str(query);
        }

        let url = Url::parse(&raw).map_err(|e| GatewayError::InvalidUpstreamUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            method: inbound.method.clone(),
            url,
            headers: filter_request_headers(&inbound.headers),
            body: inbound.body.clone(),
        })
    }

    /// Add X-Forwarded-For/-Host/-Proto describing the inbound hop.
    pub fn stamp_forwarded(&mut self, inbound: &InboundRequest) {
        append_forwarded(
            &mut self.headers,
            inbound.client_addr.map(|addr| addr.ip()),
            inbound.headers.get(header::HOST),
            "http",
        );
    }
}
