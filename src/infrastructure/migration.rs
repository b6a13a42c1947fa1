//! One-shot copy of JSON fixtures into DynamoDB tables

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use super::fixtures::{fixture_path, load_fixture};
use crate::config::TableNames;
use crate::domain::record::{into_record, Record};
use crate::domain::{DomainError, EntityKind, PostItem, TableClient, ThreadItem, UserItem};

/// Items per batch write request
pub const BATCH_SIZE: usize = 25;

/// Outcome for one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionMigration {
    pub kind: EntityKind,
    pub table: String,
    /// `None` when the fixture file was absent
    pub migrated: Option<usize>,
    pub unprocessed: usize,
}

/// Item count read back from a table after migrating
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCount {
    pub kind: EntityKind,
    pub table: String,
    /// `None` when the count failed
    pub items: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub collections: Vec<CollectionMigration>,
    pub verification: Vec<TableCount>,
}

impl MigrationReport {
    pub fn total_migrated(&self) -> usize {
        self.collections.iter().filter_map(|c| c.migrated).sum()
    }
}

/// Migrates users, threads and posts fixtures, in that order
pub struct FixtureMigrator {
    client: Arc<dyn TableClient>,
    tables: TableNames,
    fixtures_dir: PathBuf,
}

impl FixtureMigrator {
    pub fn new(client: Arc<dyn TableClient>, tables: TableNames, fixtures_dir: PathBuf) -> Self {
        Self {
            client,
            tables,
            fixtures_dir,
        }
    }

    /// Runs the migration. A failed batch aborts it; verification failures
    /// are only logged.
    pub async fn run(&self) -> Result<MigrationReport, DomainError> {
        info!(dir = %self.fixtures_dir.display(), "Starting fixture migration to DynamoDB");

        let mut collections = Vec::with_capacity(EntityKind::ALL.len());

        for kind in EntityKind::ALL {
            collections.push(self.migrate_collection(kind).await?);
        }

        let verification = self.verify().await;

        info!("Migration completed");
        Ok(MigrationReport {
            collections,
            verification,
        })
    }

    async fn migrate_collection(&self, kind: EntityKind) -> Result<CollectionMigration, DomainError> {
        let table = self.tables.get(kind).to_string();
        let path = fixture_path(&self.fixtures_dir, kind);

        info!(collection = kind.collection(), table = %table, "Migrating {}", kind.plural());

        let Some(records) = load_fixture(&path, kind.collection()).await? else {
            warn!(path = %path.display(), "{} fixture not found, skipping", kind.plural());
            return Ok(CollectionMigration {
                kind,
                table,
                migrated: None,
                unprocessed: 0,
            });
        };

        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let items = transform(kind, &records, &now)?;
        let unprocessed = self.write_batches(&table, &items).await?;

        info!(table = %table, items = items.len(), "Migrated {} {}", items.len(), kind.collection());

        Ok(CollectionMigration {
            kind,
            table,
            migrated: Some(items.len()),
            unprocessed,
        })
    }

    async fn write_batches(&self, table: &str, items: &[Record]) -> Result<usize, DomainError> {
        let mut unprocessed_total = 0;

        for (index, batch) in items.chunks(BATCH_SIZE).enumerate() {
            let unprocessed = self.client.batch_write(table, batch).await.map_err(|e| {
                error!(table, batch = index + 1, error = %e, "Error writing batch");
                e
            })?;

            if unprocessed > 0 {
                warn!(table, batch = index + 1, unprocessed, "Unprocessed items were not retried");
                unprocessed_total += unprocessed;
            }

            info!(table, batch = index + 1, items = batch.len(), "Batch written");
        }

        Ok(unprocessed_total)
    }

    async fn verify(&self) -> Vec<TableCount> {
        let mut counts = Vec::with_capacity(EntityKind::ALL.len());

        for kind in EntityKind::ALL {
            let table = self.tables.get(kind).to_string();

            let items = match self.client.scan_count(&table).await {
                Ok(items) => {
                    info!(table = %table, items, "{}: {} items", kind.plural(), items);
                    Some(items)
                }
                Err(e) => {
                    error!(table = %table, error = %e, "Failed to verify {}", kind.collection());
                    None
                }
            };

            counts.push(TableCount { kind, table, items });
        }

        counts
    }
}

/// Reshapes fixture records into the table item shape for `kind`
pub fn transform(kind: EntityKind, records: &[Record], now: &str) -> Result<Vec<Record>, DomainError> {
    records
        .iter()
        .map(|record| match kind {
            EntityKind::Users => to_record(UserItem::from_fixture(record, now)?),
            EntityKind::Threads => to_record(ThreadItem::from_fixture(record, now)?),
            EntityKind::Posts => to_record(PostItem::from_fixture(record, now)?),
        })
        .collect()
}

fn to_record<T: Serialize>(item: T) -> Result<Record, DomainError> {
    serde_json::to_value(item)
        .ok()
        .and_then(into_record)
        .ok_or_else(|| DomainError::internal("Item did not serialize to a JSON object"))
}
