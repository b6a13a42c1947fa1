//! DynamoDB table client

use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, PutRequest, ReturnValue, Select, WriteRequest};
use aws_sdk_dynamodb::Client as DynamoDbClient;
use tracing::{debug, info};

use super::attribute::{from_item, to_attribute, to_item};
use crate::domain::record::Record;
use crate::domain::storage::{IndexQuery, TableClient, UpdateExpression};
use crate::domain::DomainError;

/// Connection settings for the table store
#[derive(Debug, Clone)]
pub struct DynamoDbConfig {
    pub region: String,
    /// Overrides the service endpoint, e.g. `http://localhost:8000` for DynamoDB Local
    pub endpoint_url: Option<String>,
}

impl DynamoDbConfig {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            endpoint_url: None,
        }
    }

    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }
}

/// `TableClient` over the AWS SDK
#[derive(Clone)]
pub struct DynamoDbTableClient {
    client: DynamoDbClient,
    region: String,
}

impl Debug for DynamoDbTableClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoDbTableClient")
            .field("region", &self.region)
            .finish()
    }
}

impl DynamoDbTableClient {
    /// Builds a client from the default AWS credential chain
    pub async fn connect(config: &DynamoDbConfig) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_dynamodb::config::Builder::from(&sdk_config);

        if let Some(endpoint_url) = &config.endpoint_url {
            info!(endpoint = %endpoint_url, "Using custom DynamoDB endpoint");
            builder = builder.endpoint_url(endpoint_url);
        }

        Self {
            client: DynamoDbClient::from_conf(builder.build()),
            region: config.region.clone(),
        }
    }

    /// Wraps an existing SDK client
    pub fn with_client(client: DynamoDbClient, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }
}

fn sdk_error<E>(operation: &str, error: E) -> DomainError
where
    E: std::error::Error + Send + Sync + 'static,
{
    DomainError::storage(format!(
        "DynamoDB {} error: {}",
        operation,
        DisplayErrorContext(error)
    ))
}

fn from_items(items: &[HashMap<String, AttributeValue>]) -> Result<Vec<Record>, DomainError> {
    items.iter().map(from_item).collect()
}

#[async_trait]
impl TableClient for DynamoDbTableClient {
    async fn scan(&self, table: &str) -> Result<Vec<Record>, DomainError> {
        let output = self
            .client
            .scan()
            .table_name(table)
            .send()
            .await
            .map_err(|e| sdk_error("scan", e))?;

        from_items(output.items())
    }

    async fn scan_count(&self, table: &str) -> Result<usize, DomainError> {
        let output = self
            .client
            .scan()
            .table_name(table)
            .select(Select::Count)
            .send()
            .await
            .map_err(|e| sdk_error("count", e))?;

        Ok(output.count().max(0) as usize)
    }

    async fn probe(&self, table: &str) -> Result<(), DomainError> {
        self.client
            .scan()
            .table_name(table)
            .limit(1)
            .send()
            .await
            .map_err(|e| sdk_error("health check", e))?;

        Ok(())
    }

    async fn get_item(&self, table: &str, key: &Record) -> Result<Option<Record>, DomainError> {
        let output = self
            .client
            .get_item()
            .table_name(table)
            .set_key(Some(to_item(key)))
            .send()
            .await
            .map_err(|e| sdk_error("get", e))?;

        output.item().map(from_item).transpose()
    }

    async fn query(&self, table: &str, query: &IndexQuery) -> Result<Vec<Record>, DomainError> {
        let output = self
            .client
            .query()
            .table_name(table)
            .index_name(&query.index_name)
            .key_condition_expression(query.key_condition())
            .expression_attribute_names("#key", &query.key_name)
            .expression_attribute_values(":value", AttributeValue::S(query.key_value.clone()))
            .send()
            .await
            .map_err(|e| sdk_error("query", e))?;

        from_items(output.items())
    }

    async fn put_item(&self, table: &str, item: &Record) -> Result<(), DomainError> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(to_item(item)))
            .send()
            .await
            .map_err(|e| sdk_error("put", e))?;

        Ok(())
    }

    async fn update_item(
        &self,
        table: &str,
        key: &Record,
        update: &UpdateExpression,
    ) -> Result<Record, DomainError> {
        let names: HashMap<String, String> = update
            .names
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let values: HashMap<String, AttributeValue> = update
            .values
            .iter()
            .map(|(k, v)| (k.clone(), to_attribute(v)))
            .collect();

        let output = self
            .client
            .update_item()
            .table_name(table)
            .set_key(Some(to_item(key)))
            .update_expression(&update.expression)
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values(Some(values))
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|e| sdk_error("update", e))?;

        match output.attributes() {
            Some(attributes) => from_item(attributes),
            None => Ok(Record::new()),
        }
    }

    async fn delete_item(&self, table: &str, key: &Record) -> Result<(), DomainError> {
        self.client
            .delete_item()
            .table_name(table)
            .set_key(Some(to_item(key)))
            .send()
            .await
            .map_err(|e| sdk_error("delete", e))?;

        Ok(())
    }

    async fn batch_write(&self, table: &str, items: &[Record]) -> Result<usize, DomainError> {
        if items.is_empty() {
            return Ok(0);
        }

        let mut requests = Vec::with_capacity(items.len());

        for item in items {
            let put = PutRequest::builder()
                .set_item(Some(to_item(item)))
                .build()
                .map_err(|e| sdk_error("batch write", e))?;

            requests.push(WriteRequest::builder().put_request(put).build());
        }

        let output = self
            .client
            .batch_write_item()
            .request_items(table, requests)
            .send()
            .await
            .map_err(|e| sdk_error("batch write", e))?;

        let unprocessed = output
            .unprocessed_items()
            .and_then(|pending| pending.get(table))
            .map(|pending| pending.len())
            .unwrap_or(0);

        debug!(table, written = items.len().saturating_sub(unprocessed), unprocessed, "Batch written");
        Ok(unprocessed)
    }
}
