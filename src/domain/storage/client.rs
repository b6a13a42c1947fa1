//! Remote table client contract

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::DomainError;
use crate::domain::record::Record;

#[cfg(test)]
use mockall::automock;

/// Equality lookup on a secondary index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexQuery {
    pub index_name: String,
    pub key_name: String,
    pub key_value: String,
}

impl IndexQuery {
    pub fn new(
        index_name: impl Into<String>,
        key_name: impl Into<String>,
        key_value: impl Into<String>,
    ) -> Self {
        Self {
            index_name: index_name.into(),
            key_name: key_name.into(),
            key_value: key_value.into(),
        }
    }

    /// Key condition with placeholders, e.g. `#key = :value`
    pub fn key_condition(&self) -> &'static str {
        "#key = :value"
    }
}

/// Attribute-merge update: `SET #attr0 = :val0, #attr1 = :val1, ...`
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression {
    pub expression: String,
    pub names: BTreeMap<String, String>,
    pub values: BTreeMap<String, Value>,
}

impl UpdateExpression {
    /// Builds a `SET` clause covering exactly the attributes in `updates`
    pub fn set_all(updates: &Record) -> Result<Self, DomainError> {
        if updates.is_empty() {
            return Err(DomainError::validation("No attributes to update"));
        }

        let mut clauses = Vec::with_capacity(updates.len());
        let mut names = BTreeMap::new();
        let mut values = BTreeMap::new();

        for (index, (attribute, value)) in updates.iter().enumerate() {
            let name = format!("#attr{}", index);
            let placeholder = format!(":val{}", index);

            clauses.push(format!("{} = {}", name, placeholder));
            names.insert(name, attribute.clone());
            values.insert(placeholder, value.clone());
        }

        Ok(Self {
            expression: format!("SET {}", clauses.join(", ")),
            names,
            values,
        })
    }

    /// Attribute names touched by this update, in placeholder order
    pub fn attributes(&self) -> Vec<&str> {
        let mut indexed: Vec<(usize, &str)> = self
            .names
            .iter()
            .map(|(placeholder, attribute)| {
                let index = placeholder
                    .trim_start_matches("#attr")
                    .parse()
                    .unwrap_or(usize::MAX);
                (index, attribute.as_str())
            })
            .collect();

        indexed.sort_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, attribute)| attribute).collect()
    }
}

/// Client handle for a remote scan/get/query/put/update/delete table store.
///
/// Implementations exchange plain JSON records and map transport failures to
/// `DomainError::Storage`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TableClient: Send + Sync {
    /// Full table scan
    async fn scan(&self, table: &str) -> Result<Vec<Record>, DomainError>;

    /// Full table scan returning only the item count
    async fn scan_count(&self, table: &str) -> Result<usize, DomainError>;

    /// Minimal one-item scan used for health checks
    async fn probe(&self, table: &str) -> Result<(), DomainError>;

    /// Key lookup
    async fn get_item(&self, table: &str, key: &Record) -> Result<Option<Record>, DomainError>;

    /// Secondary index equality query
    async fn query(&self, table: &str, query: &IndexQuery) -> Result<Vec<Record>, DomainError>;

    /// Unconditional put
    async fn put_item(&self, table: &str, item: &Record) -> Result<(), DomainError>;

    /// Applies `update` to the item at `key` and returns all post-update attributes
    async fn update_item(
        &self,
        table: &str,
        key: &Record,
        update: &UpdateExpression,
    ) -> Result<Record, DomainError>;

    /// Unconditional delete
    async fn delete_item(&self, table: &str, key: &Record) -> Result<(), DomainError>;

    /// Writes up to one batch of items, returns how many were left unprocessed
    async fn batch_write(&self, table: &str, items: &[Record]) -> Result<usize, DomainError>;
}
