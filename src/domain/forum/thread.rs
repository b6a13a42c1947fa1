use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::DomainError;
use crate::domain::record::{Record, field_string, truthy_string};

const DEFAULT_CATEGORY: &str = "general";

/// Thread in table-store item shape
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadItem {
    pub thread_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub description: String,
    pub created_at: String,
}

impl ThreadItem {
    pub fn from_fixture(record: &Record, now: &str) -> Result<Self, DomainError> {
        let thread_id = field_string(record, "id")
            .ok_or_else(|| DomainError::validation("Thread fixture record has no id"))?;

        Ok(Self {
            thread_id,
            title: field_string(record, "title"),
            description: truthy_string(record, "description").unwrap_or_default(),
            created_at: truthy_string(record, "createdAt").unwrap_or_else(|| now.to_string()),
        })
    }
}

/// Body of a thread creation request. Fields are passed through unvalidated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewThread {
    #[serde(default)]
    pub user_id: Option<Value>,
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub category: Option<String>,
}

impl NewThread {
    /// Builds the record to store, without its identifier
    pub fn into_draft(self, created_at: &str) -> Record {
        let mut record = Record::new();

        if let Some(user_id) = self.user_id {
            record.insert("userId".to_string(), user_id);
        }

        if let Some(title) = self.title {
            record.insert("title".to_string(), title);
        }

        let category = self
            .category
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        record.insert("category".to_string(), Value::String(category));
        record.insert("createdAt".to_string(), Value::String(created_at.to_string()));
        record
    }
}
