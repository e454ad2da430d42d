use crate::domain::shared::identity::{CompositeKey, EntityKind};
use crate::domain::shared::pagination::PageShape;
use crate::infrastructure::http::traits::Failure;
use serde::Serialize;

/// Which listing a session manages and how its endpoint paginates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadConfig {
    pub parent: CompositeKey,
    pub child_kind: EntityKind,
    pub shape: PageShape,
    pub page_size: u32,
}

impl ThreadConfig {
    /// Comments under a community post; that endpoint reports `totalComments`.
    pub fn post_comments(parent: CompositeKey, page_size: u32) -> Self {
        Self {
            parent,
            child_kind: EntityKind::Comment,
            shape: PageShape::CommentTotal,
            page_size,
        }
    }

    /// Replies under a review; paginated with a `pagination` block.
    pub fn review_replies(parent: CompositeKey, page_size: u32) -> Self {
        Self {
            parent,
            child_kind: EntityKind::Reply,
            shape: PageShape::Paginated,
            page_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MutationStatus {
    /// The server accepted the change and local state holds its answer.
    Confirmed,
    /// The server (or the network) refused; local state was compensated.
    RolledBack(Failure),
    /// Another mutation on the same entity is still pending.
    Dropped,
    /// The target is not in the thread; nothing was sent.
    Missing,
    /// The session was cancelled before the answer could be applied.
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LoadStatus {
    Loaded { page: u32, added: usize, has_more: bool },
    /// A load is already in flight or the collection is exhausted.
    Skipped,
    Failed(Failure),
    Cancelled,
}
