use serde::Serialize;

use crate::domain::DomainError;
use crate::domain::record::{Record, field_string};

/// User in table-store item shape
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserItem {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub created_at: String,
}

impl UserItem {
    /// Reshapes a fixture user; fixtures carry no creation time so `now` is used
    pub fn from_fixture(record: &Record, now: &str) -> Result<Self, DomainError> {
        let user_id = field_string(record, "id")
            .ok_or_else(|| DomainError::validation("User fixture record has no id"))?;

        Ok(Self {
            user_id,
            email: field_string(record, "email"),
            name: field_string(record, "name"),
            created_at: now.to_string(),
        })
    }
}
