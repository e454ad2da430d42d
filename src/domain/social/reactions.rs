use crate::domain::shared::identity::UserId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use ts_rs::TS;

/// Like/dislike membership of a votable entity.
///
/// Membership is authoritative; counts are the set sizes. A user is never in
/// both sets at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Reactions {
    #[serde(default)]
    pub likes: BTreeSet<UserId>,
    #[serde(default)]
    pub dislikes: BTreeSet<UserId>,
}

impl Reactions {
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    pub fn dislike_count(&self) -> usize {
        self.dislikes.len()
    }

    pub fn has_liked(&self, user: &UserId) -> bool {
        self.likes.contains(user)
    }

    pub fn has_disliked(&self, user: &UserId) -> bool {
        self.dislikes.contains(user)
    }

    pub fn toggle_like(&mut self, user: &UserId) {
        self.dislikes.remove(user);
        if !self.likes.remove(user) {
            self.likes.insert(user.clone());
        }
    }

    pub fn toggle_dislike(&mut self, user: &UserId) {
        self.likes.remove(user);
        if !self.dislikes.remove(user) {
            self.dislikes.insert(user.clone());
        }
    }

    pub fn toggle(&mut self, user: &UserId, action: VoteAction) {
        match action {
            VoteAction::Like => self.toggle_like(user),
            VoteAction::Dislike => self.toggle_dislike(user),
        }
    }

    /// Align `user`'s membership with what the server reported.
    ///
    /// Only the acting user's membership can be confirmed from a summary;
    /// other members stay as last fetched. Should the server claim both,
    /// the like wins.
    pub fn confirm(&mut self, user: &UserId, summary: &VoteSummary) {
        self.likes.remove(user);
        self.dislikes.remove(user);
        if summary.user_liked {
            self.likes.insert(user.clone());
        } else if summary.user_disliked {
            self.dislikes.insert(user.clone());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum VoteAction {
    Like,
    Dislike,
}

impl VoteAction {
    pub fn segment(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

/// Response body of the like/dislike endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VoteSummary {
    pub likes: u64,
    pub dislikes: u64,
    pub user_liked: bool,
    pub user_disliked: bool,
}
