use crate::domain::shared::identity::{CompositeKey, EntityId, EntityKind};
use crate::domain::shared::pagination::{Page, PageRequest, PageShape};
use crate::domain::social::{
    entity::VotableEntity,
    media::{MediaItem, MediaQuery},
    reactions::{VoteAction, VoteSummary},
    value_objects::CommentBody,
};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// Why an authoritative request did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    /// The request never got an answer: offline, refused, timed out.
    Transport,
    /// The server answered `success: false` or a non-2xx status.
    Server,
    /// The server answered something we could not read.
    Decode,
    /// The session was cancelled while the request was pending.
    Cancelled,
    /// The request could not be built locally and was never sent.
    InvalidRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: Option<String>,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{:?}: {}", self.kind, message),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

/// Result-shaped answer of every backend call.
///
/// Expected failures are values, not errors: callers branch on `success`
/// and decide themselves whether to roll back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    #[serde(skip)]
    pub failure: Option<FailureKind>,
}

impl<T> Outcome<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            failure: None,
        }
    }

    pub fn ok_empty() -> Self {
        Self {
            success: true,
            data: None,
            message: None,
            failure: None,
        }
    }

    pub fn failed(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            failure: Some(kind),
        }
    }

    pub fn cancelled() -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            failure: Some(FailureKind::Cancelled),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            success: self.success,
            data: self.data.map(f),
            message: self.message,
            failure: self.failure,
        }
    }

    /// Split into the payload (possibly absent) or the failure.
    pub fn into_result(self) -> Result<Option<T>, Failure> {
        if self.success {
            Ok(self.data)
        } else {
            Err(Failure {
                kind: self.failure.unwrap_or(FailureKind::Server),
                message: self.message,
            })
        }
    }

    /// Like [`Outcome::into_result`], treating a missing payload as a decode failure.
    pub fn into_data(self) -> Result<T, Failure> {
        self.into_result()?.ok_or(Failure {
            kind: FailureKind::Decode,
            message: Some("response carried no data".into()),
        })
    }
}

/// The authoritative side of every optimistic mutation and listing.
///
/// Implementations perform the request and report; they never touch local
/// state.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn vote(&self, target: &CompositeKey, action: VoteAction) -> Outcome<VoteSummary>;

    async fn submit(
        &self,
        parent: &CompositeKey,
        child_kind: EntityKind,
        body: &CommentBody,
    ) -> Outcome<VotableEntity>;

    async fn edit(&self, target: &CompositeKey, body: &CommentBody) -> Outcome<VotableEntity>;

    async fn delete(&self, target: &CompositeKey) -> Outcome<()>;

    async fn fetch_entities(
        &self,
        parent: &CompositeKey,
        child_kind: EntityKind,
        request: PageRequest,
        shape: PageShape,
    ) -> Outcome<Page<VotableEntity>>;

    async fn fetch_media(
        &self,
        media: &EntityId,
        query: MediaQuery,
        request: PageRequest,
    ) -> Outcome<Page<MediaItem>>;
}
