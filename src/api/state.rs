//! Application state for one forum service

use std::sync::Arc;

use crate::api::types::ApiError;
use crate::domain::{DomainError, EntityKind};
use crate::infrastructure::services::ForumService;

/// Shared state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub forum: Arc<ForumService>,
}

impl AppState {
    pub fn new(forum: ForumService) -> Self {
        Self {
            forum: Arc::new(forum),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.forum.kind()
    }

    pub fn service_name(&self) -> &'static str {
        self.forum.kind().service_name()
    }

    /// Maps a domain error to this service's error response
    pub fn error(&self, err: DomainError) -> ApiError {
        ApiError::from_domain(err, self.service_name())
    }
}
