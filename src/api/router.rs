use axum::{
    middleware,
    routing::{get, MethodRouter},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::records;
use super::state::AppState;
use crate::domain::EntityKind;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Router for the service bound to `state`.
///
/// The collection is reachable at `/`, `/<collection>` and `/api/<collection>`.
pub fn create_router(state: AppState, metrics: Option<PrometheusMetrics>) -> Router {
    let kind = state.kind();
    let collection = kind.collection();

    let collection_routes = || -> MethodRouter<AppState> {
        if kind.supports_create() {
            get(records::list_records).post(records::create_record)
        } else {
            get(records::list_records)
        }
    };

    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/api/", get(health::api_info))
        .route(
            &format!("/api/{}/health", collection),
            get(health::health_check),
        );

    let bases = [
        String::new(),
        format!("/{}", collection),
        format!("/api/{}", collection),
    ];

    for base in &bases {
        let list_path = if base.is_empty() { "/" } else { base.as_str() };

        router = router
            .route(list_path, collection_routes())
            .route(&format!("{}/{{id}}", base), get(records::get_record));

        if kind == EntityKind::Posts {
            router = router
                .route(
                    &format!("{}/in-thread/{{thread_id}}", base),
                    get(records::posts_in_thread),
                )
                .route(
                    &format!("{}/by-user/{{user_id}}", base),
                    get(records::posts_by_user),
                );
        }
    }

    let mut router = router
        .route_layer(middleware::from_fn(metrics_middleware))
        .route_layer(middleware::from_fn(logging_middleware))
        .with_state(state);

    if let Some(metrics) = metrics {
        router = router.merge(create_metrics_router(metrics));
    }

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::domain::record::into_record;
    use crate::domain::storage::MockTableClient;
    use crate::domain::DomainError;
    use crate::infrastructure::services::ForumService;
    use crate::infrastructure::storage::{StorageAdapter, StorageMode};

    fn fixture_router(kind: EntityKind, values: Vec<Value>) -> Router {
        let records = values.into_iter().filter_map(into_record).collect();
        let storage =
            StorageAdapter::new(kind.collection(), Some(records), None, StorageMode::Fixture);

        create_router(AppState::new(ForumService::new(kind, storage)), None)
    }

    fn remote_router(kind: EntityKind, client: MockTableClient) -> Router {
        let storage = StorageAdapter::new(
            kind.collection(),
            None,
            Some(kind.table_key()),
            StorageMode::Remote(Arc::new(client)),
        );

        create_router(AppState::new(ForumService::new(kind, storage)), None)
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, body)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn users() -> Vec<Value> {
        vec![
            json!({"id": 1, "name": "Alice"}),
            json!({"id": 2, "name": "Bob"}),
        ]
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(fixture_router(EntityKind::Users, vec![]), get_request("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "users-service");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_prefixed_health() {
        let (status, body) = send(
            fixture_router(EntityKind::Threads, vec![]),
            get_request("/api/threads/health"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "threads-service");
    }

    #[tokio::test]
    async fn test_api_info() {
        let (status, body) =
            send(fixture_router(EntityKind::Posts, vec![]), get_request("/api/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Posts API ready to receive requests");
        assert_eq!(body["service"], "posts-service");
        assert_eq!(body["version"], "1.0.0");
    }

    #[tokio::test]
    async fn test_list_on_every_alias() {
        for uri in ["/", "/users", "/api/users"] {
            let (status, body) = send(fixture_router(EntityKind::Users, users()), get_request(uri)).await;

            assert_eq!(status, StatusCode::OK, "{}", uri);
            assert_eq!(body, json!([{"id": 1, "name": "Alice"}, {"id": 2, "name": "Bob"}]));
        }
    }

    #[tokio::test]
    async fn test_get_by_id_on_every_alias() {
        for uri in ["/2", "/users/2", "/api/users/2"] {
            let (status, body) = send(fixture_router(EntityKind::Users, users()), get_request(uri)).await;

            assert_eq!(status, StatusCode::OK, "{}", uri);
            assert_eq!(body["name"], "Bob");
        }
    }

    #[tokio::test]
    async fn test_missing_record_is_404() {
        let (status, body) =
            send(fixture_router(EntityKind::Users, users()), get_request("/users/99")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "User not found", "service": "users-service"}));
    }

    #[tokio::test]
    async fn test_create_thread_returns_201() {
        let (status, body) = send(
            fixture_router(EntityKind::Threads, vec![]),
            post_request("/api/threads", r#"{"userId": 1, "title": "Welcome"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["title"], "Welcome");
        assert_eq!(body["category"], "general");
        assert!(body["id"].is_string());
        assert!(body["createdAt"].is_string());
    }

    #[tokio::test]
    async fn test_users_have_no_create_route() {
        let (status, _) = send(
            fixture_router(EntityKind::Users, vec![]),
            post_request("/users", r#"{"name": "x"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_malformed_json_is_400_with_service() {
        let (status, body) = send(
            fixture_router(EntityKind::Posts, vec![]),
            post_request("/posts", "{not json"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["service"], "posts-service");
        assert!(body["error"].as_str().unwrap().contains("Invalid JSON"));
    }

    #[tokio::test]
    async fn test_array_body_is_400_with_service() {
        let (status, body) = send(
            fixture_router(EntityKind::Posts, vec![]),
            post_request("/posts", r#"["u1", "t1", "hello"]"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": "Request body must be a JSON object", "service": "posts-service"})
        );
    }

    #[tokio::test]
    async fn test_posts_in_thread_and_by_user() {
        let posts = vec![
            json!({"id": 1, "threadId": 1, "userId": 5}),
            json!({"id": 2, "threadId": 2, "userId": 5}),
            json!({"id": 3, "threadId": 1, "userId": 6}),
        ];

        let (status, body) = send(
            fixture_router(EntityKind::Posts, posts.clone()),
            get_request("/in-thread/1"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (_, body) = send(
            fixture_router(EntityKind::Posts, posts),
            get_request("/api/posts/by-user/5"),
        )
        .await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_thread_service_has_no_post_queries() {
        let (status, _) = send(
            fixture_router(EntityKind::Threads, vec![]),
            get_request("/in-thread/1"),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_storage_failure_is_500() {
        let mut client = MockTableClient::new();
        client
            .expect_scan()
            .returning(|_| Err(DomainError::storage("DynamoDB scan error: throttled")));

        let (status, body) = send(remote_router(EntityKind::Posts, client), get_request("/posts")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["service"], "posts-service");
        assert!(body["error"].as_str().unwrap().contains("throttled"));
    }

    #[tokio::test]
    async fn test_ready_reflects_storage_health() {
        let mut client = MockTableClient::new();
        client
            .expect_probe()
            .returning(|_| Err(DomainError::storage("ResourceNotFoundException")));

        let (status, body) = send(remote_router(EntityKind::Users, client), get_request("/ready")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "unhealthy");
        assert_eq!(body["mode"], "dynamodb");

        let (status, body) = send(fixture_router(EntityKind::Users, users()), get_request("/ready")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"], 2);
    }

    #[tokio::test]
    async fn test_cors_headers_present() {
        let request = Request::builder()
            .uri("/health")
            .header("origin", "http://localhost:8080")
            .body(Body::empty())
            .unwrap();

        let response = fixture_router(EntityKind::Users, vec![])
            .oneshot(request)
            .await
            .unwrap();

        assert!(response
            .headers()
            .contains_key("access-control-allow-origin"));
    }
}
