//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use regex::Regex;

use super::config::MetricsConfig;

static UUID_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("uuid pattern is valid")
});

static NUMERIC_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\d+(/|$)").expect("numeric pattern is valid"));

const MAX_PATH_LABEL_LEN: usize = 50;

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
    path: String,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Initialize Prometheus metrics. Returns `None` when disabled or when a
/// recorder is already installed in this process.
pub fn init_metrics(config: &MetricsConfig, service: &str) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!(
                "forum_service_info",
                "service" => service.to_string(),
                "version" => env!("CARGO_PKG_VERSION")
            )
            .set(1.0);

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
                path: config.path.clone(),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics) -> Router {
    let path = metrics.path.clone();

    Router::new()
        .route(&path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// One storage adapter call
pub struct StorageOperationMetric<'a> {
    pub table: &'a str,
    pub operation: &'a str,
    pub backend: &'a str,
    pub duration: Duration,
    pub success: bool,
}

/// Record a storage operation metric
pub fn record_storage_operation(metric: StorageOperationMetric) {
    let labels = [
        ("table", metric.table.to_string()),
        ("operation", metric.operation.to_string()),
        ("backend", metric.backend.to_string()),
        (
            "outcome",
            if metric.success { "success" } else { "error" }.to_string(),
        ),
    ];

    counter!("storage_operations_total", &labels).increment(1);
    histogram!("storage_operation_duration_seconds", &labels)
        .record(metric.duration.as_secs_f64());
}

/// Sanitize URL path for metric labels (remove IDs, limit cardinality)
fn sanitize_path(path: &str) -> String {
    let path = UUID_SEGMENT.replace_all(path, "{id}");
    let path = NUMERIC_SEGMENT.replace_all(&path, "/{id}$1");

    path.chars().take(MAX_PATH_LABEL_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path_uuid() {
        let path = "/api/posts/550e8400-e29b-41d4-a716-446655440000";
        assert_eq!(sanitize_path(path), "/api/posts/{id}");
    }

    #[test]
    fn test_sanitize_path_numeric_id() {
        assert_eq!(sanitize_path("/api/threads/123"), "/api/threads/{id}");
        assert_eq!(sanitize_path("/in-thread/7/extra"), "/in-thread/{id}/extra");
    }

    #[test]
    fn test_sanitize_path_no_id() {
        assert_eq!(sanitize_path("/health"), "/health");
    }

    #[test]
    fn test_sanitize_path_truncates_long_paths() {
        let path = "/very/long/path/that/exceeds/the/maximum/allowed/length/for/metrics";
        assert!(sanitize_path(path).len() <= MAX_PATH_LABEL_LEN);
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_http_request("GET", "/posts", 200, Duration::from_millis(3));
        record_storage_operation(StorageOperationMetric {
            table: "forum-posts",
            operation: "get_all",
            backend: "json",
            duration: Duration::from_millis(1),
            success: true,
        });
    }

    #[test]
    fn test_disabled_metrics_returns_none() {
        let config = MetricsConfig {
            enabled: false,
            path: "/metrics".to_string(),
        };

        assert!(init_metrics(&config, "posts-service").is_none());
    }
}
