//! Header manipulation.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers in both directions
//! - Add X-Forwarded-For, X-Forwarded-Proto, X-Forwarded-Host
//!
//! # Design Decisions
//! - Header sets are `http::HeaderMap`: names are stored lowercase, lookups are
//!   case-insensitive, repeated values keep their arrival order
//! - Headers listed in a `Connection` value are hop-by-hop too (RFC 9110 §7.6.1)
//! - `Host` and `Content-Length` are dropped on the way out; the client recomputes them
//! - Filtering builds a new map, so applying it twice changes nothing
//! - Existing X-Forwarded-For chains are extended, never replaced

use std::net::IpAddr;

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};

/// Connection-scoped headers that never cross the gateway.
pub const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-connection",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Additionally stripped from requests sent upstream.
const REQUEST_ONLY_HEADERS: &[&str] = &["host", "content-length"];

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_FORWARDED_HOST: &str = "x-forwarded-host";
pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// True for the fixed hop-by-hop set.
pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(&name.as_str())
}

/// Headers to copy into the upstream request.
pub fn filter_request_headers(headers: &HeaderMap) -> HeaderMap {
    filter(headers, REQUEST_ONLY_HEADERS)
}

/// Headers to copy from the upstream response back to the caller.
pub fn filter_response_headers(headers: &HeaderMap) -> HeaderMap {
    filter(headers, &[])
}

fn filter(headers: &HeaderMap, extra: &[&str]) -> HeaderMap {
    let listed = connection_tokens(headers);
    let mut filtered = HeaderMap::with_capacity(headers.len());

    for (name, value) in headers {
        let name_str = name.as_str();
        if is_hop_by_hop(name)
            || extra.contains(&name_str)
            || listed.iter().any(|token| token == name_str)
        {
            continue;
        }
        filtered.append(name.clone(), value.clone());
    }

    filtered
}

/// Lowercased header names nominated by `Connection` values.
fn connection_tokens(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|token| token.trim().to_ascii_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Stamp the X-Forwarded-* headers on an outgoing request.
///
/// `original_host` is the Host the caller addressed, taken before filtering.
pub fn append_forwarded(
    headers: &mut HeaderMap,
    client_ip: Option<IpAddr>,
    original_host: Option<&HeaderValue>,
    proto: &'static str,
) {
    if let Some(ip) = client_ip {
        let chain = headers
            .get_all(X_FORWARDED_FOR)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect::<Vec<_>>()
            .join(", ");
        let value = if chain.is_empty() {
            ip.to_string()
        } else {
            format!("{chain}, {ip}")
        };
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(X_FORWARDED_FOR, value);
        }
    }

    if let Some(host) = original_host {
        if !headers.contains_key(X_FORWARDED_HOST) {
            headers.insert(X_FORWARDED_HOST, host.clone());
        }
    }

    if !headers.contains_key(X_FORWARDED_PROTO) {
        headers.insert(X_FORWARDED_PROTO, HeaderValue::from_static(proto));
    }
}
