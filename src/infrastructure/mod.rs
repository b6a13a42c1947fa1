//! Infrastructure layer - Storage backends, fixtures, migration and observability

pub mod fixtures;
pub mod logging;
pub mod migration;
pub mod observability;
pub mod services;
pub mod storage;
