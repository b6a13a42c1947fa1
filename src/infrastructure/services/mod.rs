//! Infrastructure services

mod forum_service;

pub use forum_service::ForumService;
