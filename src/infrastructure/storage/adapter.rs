//! Storage adapter - selects a backend once and instruments every call

use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use super::fixture::FixtureStore;
use super::remote::RemoteStore;
use crate::domain::record::Record;
use crate::domain::storage::{HealthReport, RecordStore, StorageBackend, TableClient};
use crate::domain::DomainError;
use crate::infrastructure::observability::{record_storage_operation, StorageOperationMetric};

/// Primary key used when none is given
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// Backend selection, fixed for the adapter's lifetime
#[derive(Clone)]
pub enum StorageMode {
    /// Read-only records loaded from a JSON fixture
    Fixture,
    /// Live table store behind the given client
    Remote(Arc<dyn TableClient>),
}

impl StorageMode {
    pub fn backend(&self) -> StorageBackend {
        match self {
            Self::Fixture => StorageBackend::Fixture,
            Self::Remote(_) => StorageBackend::DynamoDb,
        }
    }
}

impl Debug for StorageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.backend().as_str())
    }
}

/// Uniform record access for one collection.
///
/// Cloning is cheap; clones share the same backend.
#[derive(Debug, Clone)]
pub struct StorageAdapter {
    store: Arc<dyn RecordStore>,
}

impl StorageAdapter {
    /// Creates an adapter for `table_name`. `records` are only used in fixture
    /// mode; `primary_key` defaults to `id`.
    pub fn new(
        table_name: impl Into<String>,
        records: Option<Vec<Record>>,
        primary_key: Option<&str>,
        mode: StorageMode,
    ) -> Self {
        let table_name = table_name.into();
        let primary_key = primary_key.unwrap_or(DEFAULT_PRIMARY_KEY).to_string();

        let store: Arc<dyn RecordStore> = match mode {
            StorageMode::Fixture => {
                let store = FixtureStore::new(table_name, records, primary_key);
                info!(items = store.len(), "Storage adapter using JSON fixture");
                Arc::new(store)
            }
            StorageMode::Remote(client) => {
                info!(table = %table_name, "Storage adapter using DynamoDB table");
                Arc::new(RemoteStore::new(client, table_name, primary_key))
            }
        };

        Self { store }
    }

    /// Wraps an already constructed backend
    pub fn from_store(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub fn backend(&self) -> StorageBackend {
        self.store.backend()
    }

    pub fn table_name(&self) -> &str {
        self.store.table_name()
    }

    pub fn primary_key(&self) -> &str {
        self.store.primary_key()
    }

    pub fn supports_writes(&self) -> bool {
        self.store.supports_writes()
    }

    pub async fn get_all(&self) -> Result<Vec<Record>, DomainError> {
        self.observe("get_all", self.store.get_all()).await
    }

    /// `Ok(None)` when no record has this id
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Record>, DomainError> {
        self.observe("get_by_id", self.store.get_by_id(id)).await
    }

    pub async fn query_by_index(
        &self,
        index_name: &str,
        key_name: &str,
        key_value: &str,
    ) -> Result<Vec<Record>, DomainError> {
        self.observe(
            "query_by_index",
            self.store.query_by_index(index_name, key_name, key_value),
        )
        .await
    }

    pub async fn create(&self, item: Record) -> Result<Record, DomainError> {
        self.observe("create", self.store.create(item)).await
    }

    pub async fn update(&self, id: &str, updates: Record) -> Result<Record, DomainError> {
        self.observe("update", self.store.update(id, updates)).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        self.observe("delete", self.store.delete(id)).await
    }

    pub async fn count(&self) -> Result<usize, DomainError> {
        self.observe("count", self.store.count()).await
    }

    pub async fn health_check(&self) -> HealthReport {
        let start = Instant::now();
        let report = self.store.health_check().await;

        self.record("health_check", start, report.is_healthy());
        report
    }

    async fn observe<T, F>(&self, operation: &str, call: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        let start = Instant::now();
        let result = call.await;

        debug!(
            table = %self.table_name(),
            backend = %self.backend(),
            operation,
            ok = result.is_ok(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Storage call"
        );

        self.record(operation, start, result.is_ok());
        result
    }

    fn record(&self, operation: &str, start: Instant, success: bool) {
        record_storage_operation(StorageOperationMetric {
            table: self.table_name(),
            operation,
            backend: self.backend().as_str(),
            duration: start.elapsed(),
            success,
        });
    }
}
