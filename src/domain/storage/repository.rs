//! Record store trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;
use crate::domain::record::Record;

use super::health::{HealthReport, StorageBackend};

/// Uniform record access over one storage backend.
///
/// Identifiers are always passed in string form; numeric keys in fixture data
/// are matched by their text rendering. A missing record is `Ok(None)`, never
/// an error.
#[async_trait]
pub trait RecordStore: Send + Sync + Debug {
    /// Which backend serves this store
    fn backend(&self) -> StorageBackend;

    /// Logical table or collection name
    fn table_name(&self) -> &str;

    /// Attribute holding each record's identity
    fn primary_key(&self) -> &str;

    /// Whether writes are persisted. Read-only stores accept writes but drop them.
    fn supports_writes(&self) -> bool;

    /// Retrieves every record
    async fn get_all(&self) -> Result<Vec<Record>, DomainError>;

    /// Retrieves the record whose primary key equals `id`
    async fn get_by_id(&self, id: &str) -> Result<Option<Record>, DomainError>;

    /// Retrieves the records whose `key_name` attribute equals `key_value`
    async fn query_by_index(
        &self,
        index_name: &str,
        key_name: &str,
        key_value: &str,
    ) -> Result<Vec<Record>, DomainError>;

    /// Stores `item` unconditionally and returns it as stored
    async fn create(&self, item: Record) -> Result<Record, DomainError>;

    /// Merges `updates` into the record keyed by `id` and returns the result
    async fn update(&self, id: &str, updates: Record) -> Result<Record, DomainError>;

    /// Deletes the record keyed by `id`, returns true on success
    async fn delete(&self, id: &str) -> Result<bool, DomainError>;

    /// Returns the number of stored records
    async fn count(&self) -> Result<usize, DomainError>;

    /// Reports whether the backend is reachable. Never fails.
    async fn health_check(&self) -> HealthReport;
}
