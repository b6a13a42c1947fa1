use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::DomainError;
use crate::domain::record::{Record, field_string, truthy_string};

/// Fallback parent for posts migrated without a thread or author
const DEFAULT_PARENT_ID: &str = "1";

/// Secondary index on `threadId`
pub const THREAD_INDEX: &str = "threadId-index";

/// Secondary index on `userId`
pub const USER_INDEX: &str = "userId-index";

/// Post in table-store item shape
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostItem {
    pub post_id: String,
    pub thread_id: String,
    pub user_id: String,
    pub content: String,
    pub title: String,
    pub created_at: String,
}

impl PostItem {
    /// Reshapes a fixture post. Older fixtures store the text under `body`.
    pub fn from_fixture(record: &Record, now: &str) -> Result<Self, DomainError> {
        let post_id = field_string(record, "id")
            .ok_or_else(|| DomainError::validation("Post fixture record has no id"))?;

        let content = truthy_string(record, "content")
            .or_else(|| truthy_string(record, "body"))
            .unwrap_or_default();

        Ok(Self {
            post_id,
            thread_id: truthy_string(record, "threadId")
                .unwrap_or_else(|| DEFAULT_PARENT_ID.to_string()),
            user_id: truthy_string(record, "userId")
                .unwrap_or_else(|| DEFAULT_PARENT_ID.to_string()),
            content,
            title: truthy_string(record, "title").unwrap_or_default(),
            created_at: truthy_string(record, "createdAt").unwrap_or_else(|| now.to_string()),
        })
    }
}

/// Body of a post creation request. Fields are passed through unvalidated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    #[serde(default)]
    pub user_id: Option<Value>,
    #[serde(default)]
    pub thread_id: Option<Value>,
    #[serde(default)]
    pub content: Option<Value>,
}

impl NewPost {
    /// Builds the record to store, without its identifier
    pub fn into_draft(self, created_at: &str) -> Record {
        let mut record = Record::new();

        if let Some(user_id) = self.user_id {
            record.insert("userId".to_string(), user_id);
        }

        if let Some(thread_id) = self.thread_id {
            record.insert("threadId".to_string(), thread_id);
        }

        if let Some(content) = self.content {
            record.insert("content".to_string(), content);
        }

        record.insert("createdAt".to_string(), Value::String(created_at.to_string()));
        record
    }
}
