use super::reactions::Reactions;
use crate::domain::shared::identity::{CompositeKey, EntityId, EntityKind, Keyed, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A review, comment, reply or post: anything carrying like/dislike sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VotableEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    #[serde(rename = "user")]
    pub author: UserId,
    pub content: String,
    #[serde(flatten)]
    pub reactions: Reactions,
    #[serde(default)]
    pub reply_count: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub edited_at: Option<DateTime<Utc>>,
}

impl VotableEntity {
    /// A locally created entity shown until the server confirms it.
    pub fn placeholder(kind: EntityKind, author: UserId, content: String) -> Self {
        Self {
            id: EntityId::temporary(),
            kind,
            author,
            content,
            reactions: Reactions::default(),
            reply_count: 0,
            created_at: Utc::now(),
            edited_at: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.is_temporary()
    }
}

impl Keyed for VotableEntity {
    fn key(&self) -> CompositeKey {
        CompositeKey::new(self.kind, self.id.clone())
    }

    fn id(&self) -> &EntityId {
        &self.id
    }
}
