//! Storage backend identification and health reporting

use serde::Serialize;

/// Supported storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StorageBackend {
    /// Static records loaded from a JSON fixture, read-only
    #[serde(rename = "json")]
    Fixture,
    /// Remote DynamoDB table
    #[serde(rename = "dynamodb")]
    DynamoDb,
}

impl StorageBackend {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" | "fixture" | "file" | "memory" => Some(Self::Fixture),
            "dynamodb" | "dynamo" | "ddb" => Some(Self::DynamoDb),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixture => "json",
            Self::DynamoDb => "dynamodb",
        }
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage health status
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Result of a storage health probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub mode: StorageBackend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthReport {
    /// Fixture data is always available
    pub fn fixture(items: usize) -> Self {
        Self {
            status: HealthStatus::Healthy,
            mode: StorageBackend::Fixture,
            table: None,
            items: Some(items),
            error: None,
        }
    }

    pub fn remote_healthy(table: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Healthy,
            mode: StorageBackend::DynamoDb,
            table: Some(table.into()),
            items: None,
            error: None,
        }
    }

    pub fn remote_unhealthy(table: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            mode: StorageBackend::DynamoDb,
            table: Some(table.into()),
            items: None,
            error: Some(error.into()),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}
