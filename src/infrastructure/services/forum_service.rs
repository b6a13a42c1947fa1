//! Forum service - record operations behind one entity's HTTP surface

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::domain::forum::{THREAD_INDEX, USER_INDEX};
use crate::domain::{DomainError, EntityKind, HealthReport, NewPost, NewThread, Record};
use crate::infrastructure::storage::StorageAdapter;

/// Read and create operations for one forum collection
#[derive(Debug, Clone)]
pub struct ForumService {
    kind: EntityKind,
    storage: StorageAdapter,
}

impl ForumService {
    pub fn new(kind: EntityKind, storage: StorageAdapter) -> Self {
        Self { kind, storage }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn storage(&self) -> &StorageAdapter {
        &self.storage
    }

    /// List every record in the collection
    pub async fn list(&self) -> Result<Vec<Record>, DomainError> {
        self.storage.get_all().await
    }

    /// Get a record by ID
    pub async fn get(&self, id: &str) -> Result<Option<Record>, DomainError> {
        self.storage.get_by_id(id).await
    }

    /// Get a record by ID, returning an error if not found
    pub async fn get_required(&self, id: &str) -> Result<Record, DomainError> {
        self.get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("{} not found", self.kind.singular())))
    }

    /// Create a record from a request body shaped for this collection
    pub async fn create(&self, body: Value) -> Result<Record, DomainError> {
        match self.kind {
            EntityKind::Posts => {
                let request: NewPost = parse_body(body)?;
                self.create_post(request).await
            }
            EntityKind::Threads => {
                let request: NewThread = parse_body(body)?;
                self.create_thread(request).await
            }
            EntityKind::Users => Err(DomainError::validation(format!(
                "{} cannot be created through this service",
                self.kind.plural()
            ))),
        }
    }

    pub async fn create_post(&self, request: NewPost) -> Result<Record, DomainError> {
        let draft = request.into_draft(&timestamp());
        self.insert(draft).await
    }

    pub async fn create_thread(&self, request: NewThread) -> Result<Record, DomainError> {
        let draft = request.into_draft(&timestamp());
        self.insert(draft).await
    }

    /// Posts belonging to a thread
    pub async fn posts_in_thread(&self, thread_id: &str) -> Result<Vec<Record>, DomainError> {
        self.storage
            .query_by_index(THREAD_INDEX, "threadId", thread_id)
            .await
    }

    /// Posts written by a user
    pub async fn posts_by_user(&self, user_id: &str) -> Result<Vec<Record>, DomainError> {
        self.storage.query_by_index(USER_INDEX, "userId", user_id).await
    }

    pub async fn health(&self) -> HealthReport {
        self.storage.health_check().await
    }

    async fn insert(&self, mut draft: Record) -> Result<Record, DomainError> {
        let id = Uuid::new_v4().to_string();
        draft.insert(
            self.storage.primary_key().to_string(),
            Value::String(id.clone()),
        );

        let created = self.storage.create(draft).await?;

        info!(
            service = self.kind.service_name(),
            id = %id,
            persisted = self.storage.supports_writes(),
            "{} created",
            self.kind.singular()
        );

        Ok(created)
    }
}

fn parse_body<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, DomainError> {
    if !body.is_object() {
        return Err(DomainError::validation("Request body must be a JSON object"));
    }

    serde_json::from_value(body)
        .map_err(|e| DomainError::validation(format!("Invalid request body: {}", e)))
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::domain::record::into_record;
    use crate::domain::storage::MockTableClient;
    use crate::infrastructure::storage::StorageMode;
    use serde_json::json;

    fn fixture_service(kind: EntityKind, values: Vec<Value>) -> ForumService {
        let records = values.into_iter().filter_map(into_record).collect();
        ForumService::new(
            kind,
            StorageAdapter::new(kind.collection(), Some(records), None, StorageMode::Fixture),
        )
    }

    #[tokio::test]
    async fn test_get_required_not_found_message() {
        let service = fixture_service(EntityKind::Threads, vec![]);

        let error = service.get_required("9").await.unwrap_err();

        assert!(matches!(error, DomainError::NotFound { ref message } if message == "Thread not found"));
    }

    #[tokio::test]
    async fn test_create_thread_defaults_category_and_assigns_id() {
        let service = fixture_service(EntityKind::Threads, vec![]);

        let created = service
            .create(json!({"userId": "u1", "title": "Hello"}))
            .await
            .unwrap();

        assert_eq!(created["category"], json!("general"));
        assert_eq!(created["title"], json!("Hello"));
        let id = created["id"].as_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
        assert!(created["createdAt"].as_str().unwrap().ends_with('Z'));

        // fixture mode never persists
        assert!(service.get(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_post_uses_table_key_in_remote_mode() {
        let mut client = MockTableClient::new();
        client
            .expect_put_item()
            .withf(|_, item| {
                item.get("postId").and_then(Value::as_str).is_some()
                    && item.get("content") == Some(&json!("First!"))
                    && item.get("threadId") == Some(&json!("t1"))
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let storage = StorageAdapter::new(
            "forum-microservices-posts-dev",
            None,
            Some("postId"),
            StorageMode::Remote(Arc::new(client)),
        );
        let service = ForumService::new(EntityKind::Posts, storage);

        let created = service
            .create(json!({"userId": "u1", "threadId": "t1", "content": "First!"}))
            .await
            .unwrap();

        assert!(created.contains_key("postId"));
        assert!(!created.contains_key("id"));
    }

    #[tokio::test]
    async fn test_create_rejects_users_and_non_objects() {
        let users = fixture_service(EntityKind::Users, vec![]);
        let posts = fixture_service(EntityKind::Posts, vec![]);

        assert!(matches!(
            users.create(json!({"name": "x"})).await,
            Err(DomainError::Validation { .. })
        ));
        assert!(matches!(
            posts.create(json!([1, 2])).await,
            Err(DomainError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_posts_in_thread_and_by_user() {
        let service = fixture_service(
            EntityKind::Posts,
            vec![
                json!({"id": 1, "threadId": 1, "userId": 2, "content": "a"}),
                json!({"id": 2, "threadId": 2, "userId": 2, "content": "b"}),
                json!({"id": 3, "threadId": 1, "userId": 3, "content": "c"}),
            ],
        );

        let in_thread = service.posts_in_thread("1").await.unwrap();
        let by_user = service.posts_by_user("2").await.unwrap();

        assert_eq!(in_thread.len(), 2);
        assert_eq!(in_thread[0]["content"], json!("a"));
        assert_eq!(in_thread[1]["content"], json!("c"));
        assert_eq!(by_user.len(), 2);
    }

    #[tokio::test]
    async fn test_posts_in_thread_queries_thread_index() {
        let mut client = MockTableClient::new();
        client
            .expect_query()
            .withf(|_, query| query.index_name == "threadId-index" && query.key_value == "t9")
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let storage = StorageAdapter::new(
            "posts",
            None,
            Some("postId"),
            StorageMode::Remote(Arc::new(client)),
        );

        let posts = ForumService::new(EntityKind::Posts, storage)
            .posts_in_thread("t9")
            .await
            .unwrap();

        assert!(posts.is_empty());
    }
}
