//! Liveness endpoint.
//!
//! `GET /healthz` answers `200 {"status": "ok", "service": "gateway"}` as long as
//! the process is serving. It never touches an upstream, so a dead backend does
//! not take the gateway out of rotation.

use axum::Json;
use serde::{Deserialize, Serialize};

pub const HEALTH_PATH: &str = "/healthz";

/// Body of the health response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            service: "gateway".to_string(),
        }
    }
}

pub async fn healthz() -> Json<HealthStatus> {
    Json(HealthStatus::ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_healthz_body() {
        let Json(status) = healthz().await;
        assert_eq!(
            serde_json::to_value(&status).unwrap(),
            serde_json::json!({"status": "ok", "service": "gateway"})
        );
    }
}
