//! Forum Services
//!
//! Users, threads and posts microservices with:
//! - A storage adapter over read-only JSON fixtures or DynamoDB tables
//! - One HTTP service per collection
//! - A fixture-to-DynamoDB migration command

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::AppState;
use domain::{DomainError, EntityKind, TableClient};
use infrastructure::{
    fixtures::{fixture_path, load_fixture},
    services::ForumService,
    storage::{DynamoDbConfig, DynamoDbTableClient, StorageAdapter, StorageMode},
};

/// Builds the DynamoDB client described by the storage configuration
pub async fn create_table_client(config: &AppConfig) -> Arc<dyn TableClient> {
    let mut dynamo = DynamoDbConfig::new(config.storage.region.clone());

    if let Some(endpoint_url) = &config.storage.endpoint_url {
        dynamo = dynamo.with_endpoint_url(endpoint_url.clone());
    }

    Arc::new(DynamoDbTableClient::connect(&dynamo).await)
}

/// Creates the storage adapter for `kind` in the configured mode
pub async fn create_storage(
    config: &AppConfig,
    kind: EntityKind,
) -> Result<StorageAdapter, DomainError> {
    let primary_key = config.storage.primary_key(kind);

    if config.storage.use_dynamodb {
        let client = create_table_client(config).await;

        return Ok(StorageAdapter::new(
            config.storage.tables.get(kind),
            None,
            Some(primary_key.as_str()),
            StorageMode::Remote(client),
        ));
    }

    let path = fixture_path(&config.fixtures.dir, kind);
    let records = load_fixture(&path, kind.collection()).await?;

    Ok(StorageAdapter::new(
        kind.collection(),
        records,
        Some(primary_key.as_str()),
        StorageMode::Fixture,
    ))
}

/// Creates application state for the service serving `kind`
pub async fn create_app_state(
    config: &AppConfig,
    kind: EntityKind,
) -> Result<AppState, DomainError> {
    let storage = create_storage(config, kind).await?;

    info!(
        service = kind.service_name(),
        backend = %storage.backend(),
        primary_key = storage.primary_key(),
        "Storage ready"
    );

    Ok(AppState::new(ForumService::new(kind, storage)))
}
