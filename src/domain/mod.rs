//! Domain layer - Core records, entities and storage contracts

pub mod error;
pub mod forum;
pub mod record;
pub mod storage;

pub use error::DomainError;
pub use forum::{EntityKind, NewPost, NewThread, PostItem, ThreadItem, UserItem};
pub use record::Record;
pub use storage::{
    HealthReport, HealthStatus, IndexQuery, RecordStore, StorageBackend, TableClient,
    UpdateExpression,
};
