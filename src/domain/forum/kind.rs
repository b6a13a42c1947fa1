//! Entity kinds served by the forum services

use std::str::FromStr;

use crate::domain::DomainError;

/// The three forum collections, one service each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Users,
    Threads,
    Posts,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [Self::Users, Self::Threads, Self::Posts];

    /// Collection name used in URLs and fixture files (`users`, `threads`, `posts`)
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Threads => "threads",
            Self::Posts => "posts",
        }
    }

    /// Service name reported in health and error bodies
    pub fn service_name(&self) -> &'static str {
        match self {
            Self::Users => "users-service",
            Self::Threads => "threads-service",
            Self::Posts => "posts-service",
        }
    }

    /// Singular display name (`User`, `Thread`, `Post`)
    pub fn singular(&self) -> &'static str {
        match self {
            Self::Users => "User",
            Self::Threads => "Thread",
            Self::Posts => "Post",
        }
    }

    /// Plural display name (`Users`, `Threads`, `Posts`)
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Users => "Users",
            Self::Threads => "Threads",
            Self::Posts => "Posts",
        }
    }

    /// Primary key attribute of the table-store item shape
    pub fn table_key(&self) -> &'static str {
        match self {
            Self::Users => "userId",
            Self::Threads => "threadId",
            Self::Posts => "postId",
        }
    }

    /// Whether the service exposes a create endpoint
    pub fn supports_create(&self) -> bool {
        matches!(self, Self::Threads | Self::Posts)
    }
}

impl FromStr for EntityKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "users" | "user" => Ok(Self::Users),
            "threads" | "thread" => Ok(Self::Threads),
            "posts" | "post" => Ok(Self::Posts),
            other => Err(DomainError::validation(format!(
                "Unknown service '{}', expected one of: users, threads, posts",
                other
            ))),
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.collection())
    }
}
