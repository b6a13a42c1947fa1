//! Table-store backed record store

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error};

use crate::domain::record::Record;
use crate::domain::storage::{
    HealthReport, IndexQuery, RecordStore, StorageBackend, TableClient, UpdateExpression,
};
use crate::domain::DomainError;

/// Record store over a remote table. Every call is a live round trip.
///
/// There is no retry, no conditional write and no local cache: creates and
/// updates are last-write-wins, deletes succeed whether or not the key exists.
pub struct RemoteStore {
    client: Arc<dyn TableClient>,
    table_name: String,
    primary_key: String,
}

impl Debug for RemoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteStore")
            .field("table_name", &self.table_name)
            .field("primary_key", &self.primary_key)
            .finish()
    }
}

impl RemoteStore {
    pub fn new(
        client: Arc<dyn TableClient>,
        table_name: impl Into<String>,
        primary_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            primary_key: primary_key.into(),
        }
    }

    fn key(&self, id: &str) -> Record {
        let mut key = Record::new();
        key.insert(self.primary_key.clone(), Value::String(id.to_string()));
        key
    }

    fn logged<T>(&self, operation: &str, result: Result<T, DomainError>) -> Result<T, DomainError> {
        if let Err(e) = &result {
            error!(table = %self.table_name, operation, error = %e, "DynamoDB {} error", operation);
        }
        result
    }
}

#[async_trait]
impl RecordStore for RemoteStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::DynamoDb
    }

    fn table_name(&self) -> &str {
        &self.table_name
    }

    fn primary_key(&self) -> &str {
        &self.primary_key
    }

    fn supports_writes(&self) -> bool {
        true
    }

    async fn get_all(&self) -> Result<Vec<Record>, DomainError> {
        let result = self.client.scan(&self.table_name).await;
        self.logged("scan", result)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Record>, DomainError> {
        let result = self.client.get_item(&self.table_name, &self.key(id)).await;
        self.logged("get", result)
    }

    async fn query_by_index(
        &self,
        index_name: &str,
        key_name: &str,
        key_value: &str,
    ) -> Result<Vec<Record>, DomainError> {
        let query = IndexQuery::new(index_name, key_name, key_value);
        let result = self.client.query(&self.table_name, &query).await;
        self.logged("query", result)
    }

    async fn create(&self, item: Record) -> Result<Record, DomainError> {
        let result = self.client.put_item(&self.table_name, &item).await;
        self.logged("put", result)?;

        debug!(table = %self.table_name, "Item stored");
        Ok(item)
    }

    async fn update(&self, id: &str, updates: Record) -> Result<Record, DomainError> {
        let update = self.logged("update", UpdateExpression::set_all(&updates))?;

        let result = self
            .client
            .update_item(&self.table_name, &self.key(id), &update)
            .await;
        self.logged("update", result)
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let result = self.client.delete_item(&self.table_name, &self.key(id)).await;
        self.logged("delete", result)?;
        Ok(true)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let result = self.client.scan_count(&self.table_name).await;
        self.logged("count", result)
    }

    async fn health_check(&self) -> HealthReport {
        match self.client.probe(&self.table_name).await {
            Ok(()) => HealthReport::remote_healthy(&self.table_name),
            Err(e) => HealthReport::remote_unhealthy(&self.table_name, e.to_string()),
        }
    }
}
