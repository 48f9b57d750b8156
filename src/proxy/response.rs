//! Upstream response model.

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};

/// Response as received from the upstream, before header filtering.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl UpstreamResponse {
    /// Drain a reqwest response into memory.
    pub async fn read(response: reqwest::Response) -> Result<Self, reqwest::Error> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(Self { status, headers, body })
    }
}
