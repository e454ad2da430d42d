use super::applier::{self, Removed};
use crate::domain::shared::identity::{EntityId, UserId};
use crate::domain::social::{
    entity::VotableEntity,
    reactions::{Reactions, VoteAction},
    thread::{Placement, Thread},
};
use chrono::{DateTime, Utc};

/// A user action applied to local state ahead of the server.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Vote {
        target: EntityId,
        user: UserId,
        action: VoteAction,
    },
    Submit {
        placeholder: VotableEntity,
        placement: Placement,
    },
    Edit {
        target: EntityId,
        content: String,
    },
    Delete {
        target: EntityId,
    },
}

/// The inverse of an applied [`Mutation`].
#[derive(Debug, Clone, PartialEq)]
pub enum Compensation {
    RestoreReactions {
        target: EntityId,
        reactions: Reactions,
    },
    RemovePlaceholder {
        temp_id: EntityId,
    },
    RestoreContent {
        target: EntityId,
        content: String,
        edited_at: Option<DateTime<Utc>>,
    },
    Reinsert(Removed<VotableEntity>),
}

impl Mutation {
    /// Apply to `thread`. `None` when the target is not in the thread, in
    /// which case nothing changed.
    pub fn apply(self, thread: &mut Thread<VotableEntity>) -> Option<Compensation> {
        match self {
            Mutation::Vote {
                target,
                user,
                action,
            } => {
                let entry = thread.get_mut(&target)?;
                let reactions = entry.reactions.clone();
                entry.reactions.toggle(&user, action);
                Some(Compensation::RestoreReactions { target, reactions })
            }
            Mutation::Submit {
                placeholder,
                placement,
            } => {
                let temp_id = placeholder.id.clone();
                applier::insert_optimistic(thread, placeholder, placement)
                    .then_some(Compensation::RemovePlaceholder { temp_id })
            }
            Mutation::Edit { target, content } => {
                let (content, edited_at) = applier::replace_content(thread, &target, content)?;
                Some(Compensation::RestoreContent {
                    target,
                    content,
                    edited_at,
                })
            }
            Mutation::Delete { target } => {
                applier::remove_entry(thread, &target).map(Compensation::Reinsert)
            }
        }
    }
}

impl Compensation {
    pub fn apply(self, thread: &mut Thread<VotableEntity>) {
        match self {
            Compensation::RestoreReactions { target, reactions } => {
                if let Some(entry) = thread.get_mut(&target) {
                    entry.reactions = reactions;
                }
            }
            Compensation::RemovePlaceholder { temp_id } => {
                thread.remove_matching(|entry| entry.id == temp_id);
            }
            Compensation::RestoreContent {
                target,
                content,
                edited_at,
            } => {
                if let Some(entry) = thread.get_mut(&target) {
                    entry.content = content;
                    entry.edited_at = edited_at;
                }
            }
            Compensation::Reinsert(removed) => {
                applier::restore_entry(thread, removed);
            }
        }
    }
}
