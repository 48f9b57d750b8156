//! Response handling and transformation.
//!
//! # Responsibilities
//! - Relay the upstream response to the caller
//! - Strip hop-by-hop headers on the way back
//! - Map gateway errors to status codes and a small JSON body
//!
//! # Design Decisions
//! - Body bytes are copied verbatim, never parsed
//! - Upstream timeouts result in 504 Gateway Timeout, other upstream failures in 502
//! - Error bodies carry a fixed message, never the underlying error text

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::proxy::error::GatewayError;
use crate::proxy::response::UpstreamResponse;
use crate::security::headers::filter_response_headers;

/// What the gateway sends back to the caller. Always populated.
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl GatewayResponse {
    /// Relay a successful upstream exchange.
    pub fn from_upstream(upstream: UpstreamResponse) -> Self {
        Self {
            status: upstream.status,
            headers: filter_response_headers(&upstream.headers),
            body: upstream.body,
        }
    }

    /// Synthesize a response for a failure.
    pub fn from_error(err: &GatewayError) -> Self {
        let status = err.status();
        let body = serde_json::json!({
            "error": err.public_message(),
            "status": status.as_u16(),
        });

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Self {
            status,
            headers,
            body: Bytes::from(body.to_string()),
        }
    }
}

impl From<GatewayError> for GatewayResponse {
    fn from(err: GatewayError) -> Self {
        Self::from_error(&err)
    }
}

impl IntoResponse for GatewayResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_from_upstream_is_verbatim_minus_hop_by_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/octet-stream"));
        headers.insert("transfer-encoding", HeaderValue::from_static("chunked"));
        headers.insert("connection", HeaderValue::from_static("close"));
        headers.insert("x-upstream", HeaderValue::from_static("users"));
        let body = Bytes::from_static(&[0x00, 0xff, 0x10, 0x80]);

        let response = GatewayResponse::from_upstream(UpstreamResponse {
            status: StatusCode::CREATED,
            headers,
            body: body.clone(),
        });

        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(response.body, body);
        assert_eq!(response.headers.len(), 2);
        assert_eq!(response.headers["x-upstream"], "users");
        assert_eq!(response.headers["content-type"], "application/octet-stream");
    }

    #[test]
    fn test_from_error_json_body() {
        let response = GatewayResponse::from(GatewayError::UpstreamTimeout(Duration::from_secs(30)));

        assert_eq!(response.status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(response.headers[header::CONTENT_TYPE], "application/json");
        let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(body, serde_json::json!({"error": "upstream timeout", "status": 504}));
    }

    #[test]
    fn test_into_response() {
        let response = GatewayResponse::from(GatewayError::RouteNotFound("/nope".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    }
}
