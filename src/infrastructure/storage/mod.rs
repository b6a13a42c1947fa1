//! Storage infrastructure - Fixture and DynamoDB record stores

mod adapter;
mod attribute;
mod dynamodb;
mod fixture;
mod remote;

pub use adapter::{StorageAdapter, StorageMode, DEFAULT_PRIMARY_KEY};
pub use dynamodb::{DynamoDbConfig, DynamoDbTableClient};
pub use fixture::FixtureStore;
pub use remote::RemoteStore;
