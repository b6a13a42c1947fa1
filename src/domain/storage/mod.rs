//! Storage domain - Record access abstraction over fixture and table backends

mod client;
mod health;
mod repository;

pub use client::{IndexQuery, TableClient, UpdateExpression};
pub use health::{HealthReport, HealthStatus, StorageBackend};
pub use repository::RecordStore;

#[cfg(test)]
pub use client::MockTableClient;
