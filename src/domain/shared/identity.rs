//! Identities shared by every listing and mutation.
//!
//! Server ids are opaque strings. Entities created locally before the server
//! confirms them carry a temporary id starting with [`TEMP_ID_PREFIX`], which
//! can never collide with a server-issued id.

use super::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

/// Prefix marking ids minted locally for optimistic placeholders.
pub const TEMP_ID_PREFIX: &str = "temp-";

const MAX_ID_LENGTH: usize = 128;

/// Characters that would let an id escape its URL path segment.
const FORBIDDEN_ID_CHARS: &[char] = &['/', '\\', '?', '#', '%'];

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Parse an id coming from user input (CLI arguments, routes).
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::ValidationError("id must not be empty".into()));
        }
        if trimmed.len() > MAX_ID_LENGTH {
            return Err(DomainError::ValidationError(format!(
                "id must be at most {} characters",
                MAX_ID_LENGTH
            )));
        }
        if trimmed == "." || trimmed == ".." || trimmed.contains(FORBIDDEN_ID_CHARS) {
            return Err(DomainError::ValidationError(format!(
                "id {:?} contains path characters",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Mint a fresh placeholder id.
    pub fn temporary() -> Self {
        Self(format!("{}{}", TEMP_ID_PREFIX, Uuid::new_v4()))
    }

    pub fn is_temporary(&self) -> bool {
        self.0.starts_with(TEMP_ID_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum EntityKind {
    Review,
    Comment,
    Reply,
    Post,
    Media,
}

impl EntityKind {
    /// Collection segment used in resource paths (`/api/reviews/...`).
    pub fn segment(self) -> &'static str {
        match self {
            Self::Review => "reviews",
            Self::Comment => "comments",
            Self::Reply => "replies",
            Self::Post => "posts",
            Self::Media => "media",
        }
    }

    /// Action segment used when submitting a child of this kind.
    pub fn submit_action(self) -> &'static str {
        match self {
            Self::Review => "review",
            Self::Comment => "comment",
            Self::Reply => "reply",
            Self::Post => "post",
            Self::Media => "media",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.submit_action())
    }
}

/// The (type, id) pair merged listings are de-duplicated by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompositeKey {
    pub kind: EntityKind,
    pub id: EntityId,
}

impl CompositeKey {
    pub fn new(kind: EntityKind, id: EntityId) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Anything a [`Thread`](crate::domain::social::thread::Thread) can hold.
pub trait Keyed {
    fn key(&self) -> CompositeKey;

    fn id(&self) -> &EntityId;
}
