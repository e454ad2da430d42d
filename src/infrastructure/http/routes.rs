//! Resource paths, as segments appended to the configured API base URL.
//!
//! Ids travel as single segments; the client percent-encodes each one, so an
//! id can never add segments, a query or a fragment of its own.

use crate::domain::shared::identity::{CompositeKey, EntityId, EntityKind};
use crate::domain::social::{media::MediaQuery, reactions::VoteAction};

pub type Segments<'a> = Vec<&'a str>;

pub fn vote(target: &CompositeKey, action: VoteAction) -> Segments<'_> {
    vec![
        "api",
        target.kind.segment(),
        target.id.as_str(),
        action.segment(),
    ]
}

pub fn submit(parent: &CompositeKey, child_kind: EntityKind) -> Segments<'_> {
    vec![
        "api",
        parent.kind.segment(),
        parent.id.as_str(),
        child_kind.submit_action(),
    ]
}

/// `PUT` (edit) and `DELETE` target.
pub fn entity(target: &CompositeKey) -> Segments<'_> {
    vec!["api", target.kind.segment(), target.id.as_str()]
}

pub fn children(parent: &CompositeKey, child_kind: EntityKind) -> Segments<'_> {
    vec![
        "api",
        parent.kind.segment(),
        parent.id.as_str(),
        child_kind.segment(),
    ]
}

pub fn related_media(media: &EntityId, query: MediaQuery) -> Segments<'_> {
    vec!["api", "media", media.as_str(), query.segment()]
}
