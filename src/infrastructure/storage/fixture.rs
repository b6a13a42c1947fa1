//! Fixture-backed record store

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::record::{self, Record};
use crate::domain::storage::{HealthReport, RecordStore, StorageBackend};
use crate::domain::DomainError;

/// Read-only store over records loaded once from a JSON fixture.
///
/// Writes are accepted and answered as if they succeeded, but nothing is
/// persisted: later reads always see the collection as constructed.
#[derive(Debug, Clone)]
pub struct FixtureStore {
    table_name: String,
    primary_key: String,
    records: Arc<Vec<Record>>,
}

impl FixtureStore {
    /// Creates a store over `records`; `None` behaves as an empty collection
    pub fn new(
        table_name: impl Into<String>,
        records: Option<Vec<Record>>,
        primary_key: impl Into<String>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            primary_key: primary_key.into(),
            records: Arc::new(records.unwrap_or_default()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn find(&self, id: &str) -> Option<&Record> {
        self.records
            .iter()
            .find(|r| record::field_matches(r, &self.primary_key, id))
    }
}

#[async_trait]
impl RecordStore for FixtureStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Fixture
    }

    fn table_name(&self) -> &str {
        &self.table_name
    }

    fn primary_key(&self) -> &str {
        &self.primary_key
    }

    fn supports_writes(&self) -> bool {
        false
    }

    async fn get_all(&self) -> Result<Vec<Record>, DomainError> {
        Ok(self.records.as_ref().clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Record>, DomainError> {
        Ok(self.find(id).cloned())
    }

    async fn query_by_index(
        &self,
        _index_name: &str,
        key_name: &str,
        key_value: &str,
    ) -> Result<Vec<Record>, DomainError> {
        // No indexes here: every query is a full scan
        Ok(self
            .records
            .iter()
            .filter(|r| record::field_matches(r, key_name, key_value))
            .cloned()
            .collect())
    }

    async fn create(&self, item: Record) -> Result<Record, DomainError> {
        warn!(table = %self.table_name, "JSON mode is read-only, cannot create items");
        Ok(item)
    }

    async fn update(&self, id: &str, updates: Record) -> Result<Record, DomainError> {
        warn!(table = %self.table_name, id = %id, "JSON mode is read-only, cannot update items");

        let base = self.find(id).cloned().unwrap_or_default();
        Ok(record::merge(base, &updates))
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        warn!(table = %self.table_name, id = %id, "JSON mode is read-only, cannot delete items");
        Ok(false)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.records.len())
    }

    async fn health_check(&self) -> HealthReport {
        HealthReport::fixture(self.records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::into_record;
    use serde_json::{Value, json};

    fn records(value: Value) -> Vec<Record> {
        value
            .as_array()
            .unwrap()
            .iter()
            .cloned()
            .map(|v| into_record(v).unwrap())
            .collect()
    }

    fn alice_store() -> FixtureStore {
        FixtureStore::new("users", Some(records(json!([{"id": 1, "name": "Alice"}]))), "id")
    }

    fn posts_store() -> FixtureStore {
        FixtureStore::new(
            "posts",
            Some(records(json!([
                {"id": 1, "threadId": 1, "userId": 1, "content": "First post!"},
                {"id": 2, "threadId": 1, "userId": 2, "content": "Great discussion!"},
                {"id": 3, "threadId": 2, "userId": 1, "content": "Another post"}
            ]))),
            "id",
        )
    }

    #[tokio::test]
    async fn test_alice_scenario() {
        let store = alice_store();
        let alice = json!({"id": 1, "name": "Alice"});

        let found = store.get_by_id("1").await.unwrap();
        assert_eq!(found.map(Value::Object), Some(alice.clone()));

        assert!(store.get_by_id("2").await.unwrap().is_none());

        let queried = store.query_by_index("x", "name", "Alice").await.unwrap();
        assert_eq!(queried.len(), 1);
        assert_eq!(Value::Object(queried[0].clone()), alice);

        assert!(!store.delete("1").await.unwrap());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_all_returns_collection_verbatim() {
        let store = posts_store();

        let all = store.get_all().await.unwrap();

        assert_eq!(all.len(), 3);
        assert_eq!(all[1]["content"], json!("Great discussion!"));
    }

    #[tokio::test]
    async fn test_unset_collection_is_empty() {
        let store = FixtureStore::new("users", None, "id");

        assert!(store.get_all().await.unwrap().is_empty());
        assert!(store.get_by_id("1").await.unwrap().is_none());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_by_id_matches_integral_float_id() {
        let store = FixtureStore::new("users", Some(records(json!([{"id": 1.0, "name": "Ann"}]))), "id");

        let found = store.get_by_id("1").await.unwrap();

        assert_eq!(found.unwrap()["name"], json!("Ann"));
        assert!(store.get_by_id("1.0").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_by_id_uses_configured_primary_key() {
        let store = FixtureStore::new(
            "posts",
            Some(records(json!([{"postId": "p1", "id": 99}]))),
            "postId",
        );

        assert!(store.get_by_id("p1").await.unwrap().is_some());
        assert!(store.get_by_id("99").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_query_preserves_order() {
        let store = posts_store();

        let by_user = store.query_by_index("userId-index", "userId", "1").await.unwrap();

        let ids: Vec<_> = by_user.iter().map(|r| r["id"].clone()).collect();
        assert_eq!(ids, vec![json!(1), json!(3)]);
    }

    #[tokio::test]
    async fn test_query_ignores_index_name() {
        // Fixture mode has no indexes, so any index name scans the whole collection
        let store = posts_store();

        let named = store.query_by_index("threadId-index", "threadId", "1").await.unwrap();
        let unrelated = store.query_by_index("no-such-index", "threadId", "1").await.unwrap();

        assert_eq!(named, unrelated);
        assert_eq!(named.len(), 2);
    }

    #[tokio::test]
    async fn test_query_without_matches_is_empty() {
        let store = posts_store();

        let result = store.query_by_index("threadId-index", "threadId", "999").await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_create_returns_item_but_does_not_persist() {
        let store = alice_store();
        let item = into_record(json!({"id": 2, "name": "Bob"})).unwrap();

        let created = store.create(item.clone()).await.unwrap();

        assert_eq!(created, item);
        assert_eq!(store.get_all().await.unwrap().len(), 1);
        assert!(store.get_by_id("2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_merges_without_persisting() {
        let store = alice_store();
        let updates = into_record(json!({"name": "Alicia"})).unwrap();

        let merged = store.update("1", updates).await.unwrap();

        assert_eq!(Value::Object(merged), json!({"id": 1, "name": "Alicia"}));

        let stored = store.get_by_id("1").await.unwrap().unwrap();
        assert_eq!(stored["name"], json!("Alice"));
    }

    #[tokio::test]
    async fn test_count_unchanged_by_writes() {
        let store = posts_store();

        store.create(into_record(json!({"id": 4})).unwrap()).await.unwrap();
        store.update("1", into_record(json!({"content": "x"})).unwrap()).await.unwrap();
        store.delete("2").await.unwrap();

        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_health_check_reports_item_count() {
        let report = posts_store().health_check().await;

        assert!(report.is_healthy());
        assert_eq!(report.mode, StorageBackend::Fixture);
        assert_eq!(report.items, Some(3));
    }

    #[test]
    fn test_does_not_support_writes() {
        assert!(!alice_store().supports_writes());
    }
}
