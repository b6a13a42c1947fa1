//! Health, readiness and service info endpoints

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::api::types::Json;
use crate::domain::HealthReport;

use super::state::AppState;

/// Liveness body
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: String,
}

/// Readiness body: the storage health report tagged with the service
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub service: &'static str,
    #[serde(flatten)]
    pub storage: HealthReport,
}

#[derive(Debug, Serialize)]
pub struct ApiInfoResponse {
    pub message: String,
    pub service: &'static str,
    pub version: &'static str,
}

/// Returns 200 while the process is up
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy",
        service: state.service_name(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    (StatusCode::OK, Json(response))
}

/// Probes the storage backend; 503 when it is unhealthy
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let report = state.forum.health().await;

    let status_code = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = ReadyResponse {
        service: state.service_name(),
        storage: report,
    };

    (status_code, Json(response))
}

pub async fn api_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiInfoResponse {
        message: format!("{} API ready to receive requests", state.kind().plural()),
        service: state.service_name(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StorageBackend;

    #[test]
    fn test_ready_response_flattens_report() {
        let response = ReadyResponse {
            service: "posts-service",
            storage: HealthReport::remote_unhealthy("posts", "no such table"),
        };

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["service"], "posts-service");
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["mode"], StorageBackend::DynamoDb.as_str());
        assert_eq!(json["error"], "no such table");
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "healthy",
            service: "users-service",
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(json.contains("\"service\":\"users-service\""));
    }
}
