//! A listing under one parent, with optimistic mutations on its entries.
//!
//! Every mutation follows the same protocol: take the entity's in-flight
//! guard, apply the change locally, ask the backend, then either fold the
//! server's answer in or apply the compensation. Transport failures also
//! refetch the first page, since local state may have drifted from the
//! server in ways a single compensation cannot see.
//!
//! Locks on the loader are only held for synchronous sections, never across
//! a backend call, so mutations on different entities interleave freely.

use super::{
    dto::{LoadStatus, MutationStatus, ThreadConfig},
    guards::InFlightGuards,
    notices::{Notice, NoticeBus},
};
use crate::application::optimistic::{
    applier,
    mutation::{Compensation, Mutation},
};
use crate::application::pagination::loader::{PageTicket, PaginatedLoader};
use crate::domain::shared::{
    errors::DomainError,
    identity::{CompositeKey, EntityId, Keyed, UserId},
    pagination::{LoadState, PageCursor, PageRequest},
};
use crate::domain::social::{
    entity::VotableEntity,
    reactions::VoteAction,
    thread::Placement,
    value_objects::CommentBody,
};
use crate::infrastructure::http::{
    errors::default_message,
    traits::{Backend, Failure, FailureKind, Outcome},
};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

pub struct ThreadSession<B: ?Sized> {
    backend: Arc<B>,
    config: ThreadConfig,
    loader: Mutex<PaginatedLoader<VotableEntity>>,
    guards: InFlightGuards,
    cancel: CancellationToken,
    notices: NoticeBus,
}

impl<B: Backend + ?Sized> ThreadSession<B> {
    pub fn new(backend: Arc<B>, config: ThreadConfig, notices: NoticeBus) -> Self {
        Self {
            backend,
            config,
            loader: Mutex::new(PaginatedLoader::new()),
            guards: InFlightGuards::new(),
            cancel: CancellationToken::new(),
            notices,
        }
    }

    /// Tie this session to an outer token, e.g. the owning view's lifetime.
    pub fn with_parent_token(mut self, parent: &CancellationToken) -> Self {
        self.cancel = parent.child_token();
        self
    }

    pub fn config(&self) -> &ThreadConfig {
        &self.config
    }

    /// Stop applying responses. Requests already sent are not aborted on
    /// the server, but whatever they answer is discarded.
    pub fn cancel(&self) {
        info!(parent = %self.config.parent, "thread session cancelled");
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn entries(&self) -> Vec<VotableEntity> {
        self.loader().thread().entries().to_vec()
    }

    pub fn get(&self, id: &EntityId) -> Option<VotableEntity> {
        self.loader().thread().get(id).cloned()
    }

    pub fn total(&self) -> u64 {
        self.loader().thread().total()
    }

    pub fn cursor(&self) -> PageCursor {
        self.loader().cursor()
    }

    pub fn state(&self) -> LoadState {
        self.loader().state()
    }

    pub fn is_pending(&self, id: &EntityId) -> bool {
        self.guards.is_active(id)
    }

    fn loader(&self) -> MutexGuard<'_, PaginatedLoader<VotableEntity>> {
        self.loader.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Await a backend call unless the session is cancelled first.
    async fn guarded<T>(&self, request: impl Future<Output = Outcome<T>>) -> Outcome<T> {
        if self.cancel.is_cancelled() {
            return Outcome::cancelled();
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Outcome::cancelled(),
            outcome = request => {
                if self.cancel.is_cancelled() {
                    Outcome::cancelled()
                } else {
                    outcome
                }
            }
        }
    }

    pub async fn load_first(&self) -> LoadStatus {
        self.load_page(1).await
    }

    pub async fn load_more(&self) -> LoadStatus {
        let next = self.loader().next_page();
        self.load_page(next).await
    }

    /// Refetch the first page as the authoritative state.
    pub async fn refresh(&self) -> LoadStatus {
        self.load_page(1).await
    }

    #[instrument(skip(self), fields(parent = %self.config.parent))]
    pub async fn load_page(&self, page: u32) -> LoadStatus {
        let ticket = {
            let mut loader = self.loader();
            loader.begin(page)
        };
        let Some(ticket) = ticket else {
            return LoadStatus::Skipped;
        };
        let status = self.fetch_page(ticket).await;
        self.run_deferred_refresh().await;
        status
    }

    /// Refetch page 1 after a failure that may have left local state out of
    /// step with the server. Runs after the load in flight, if there is one.
    async fn refresh_after_failure(&self) {
        let ticket = self.loader().begin_refresh();
        match ticket {
            Some(ticket) => {
                let refreshed = self.fetch_page(ticket).await;
                debug!(?refreshed, "authoritative refetch after transport failure");
                self.run_deferred_refresh().await;
            }
            None => debug!("refetch queued behind the page load in flight"),
        }
    }

    async fn run_deferred_refresh(&self) {
        loop {
            let ticket = self.loader().take_deferred_refresh();
            let Some(ticket) = ticket else {
                break;
            };
            let refreshed = self.fetch_page(ticket).await;
            debug!(?refreshed, "deferred refetch after transport failure");
        }
    }

    async fn fetch_page(&self, ticket: PageTicket) -> LoadStatus {
        let request = PageRequest::new(ticket.page, self.config.page_size);
        debug!(page = ticket.page, shape = ?self.config.shape, "fetching page");
        let outcome = self
            .guarded(self.backend.fetch_entities(
                &self.config.parent,
                self.config.child_kind,
                request,
                self.config.shape,
            ))
            .await;

        match outcome.into_data() {
            Ok(fetched) => {
                let mut loader = self.loader();
                let added = loader.complete(ticket, fetched.items, fetched.meta);
                LoadStatus::Loaded {
                    page: ticket.page,
                    added,
                    has_more: loader.cursor().has_more,
                }
            }
            Err(failure) if failure.kind == FailureKind::Cancelled => {
                self.loader().fail(ticket);
                LoadStatus::Cancelled
            }
            Err(failure) => {
                self.loader().fail(ticket);
                warn!(page = ticket.page, failure = %failure, "page load failed");
                self.notices.publish(Notice::LoadFailed {
                    parent: self.config.parent.clone(),
                    page: ticket.page,
                    message: user_message(&failure),
                });
                LoadStatus::Failed(failure)
            }
        }
    }

    pub async fn like(&self, id: &EntityId, user: &UserId) -> MutationStatus {
        self.vote(id, user, VoteAction::Like).await
    }

    pub async fn dislike(&self, id: &EntityId, user: &UserId) -> MutationStatus {
        self.vote(id, user, VoteAction::Dislike).await
    }

    #[instrument(skip(self), fields(parent = %self.config.parent))]
    pub async fn vote(&self, id: &EntityId, user: &UserId, action: VoteAction) -> MutationStatus {
        if self.is_cancelled() {
            return MutationStatus::Discarded;
        }
        let Some(_guard) = self.guards.try_acquire(id) else {
            debug!(id = %id, "vote already pending, dropping");
            return MutationStatus::Dropped;
        };

        let Some((key, compensation)) = self.apply_to(
            id,
            Mutation::Vote {
                target: id.clone(),
                user: user.clone(),
                action,
            },
        ) else {
            return MutationStatus::Missing;
        };

        let outcome = self.guarded(self.backend.vote(&key, action)).await;
        match outcome.into_data() {
            Ok(summary) => {
                if let Some(entry) = self.loader().thread_mut().get_mut(id) {
                    entry.reactions.confirm(user, &summary);
                }
                MutationStatus::Confirmed
            }
            Err(failure) => {
                let notice = |message| Notice::MutationRejected {
                    target: key.clone(),
                    action: action.segment(),
                    message,
                };
                self.settle_failure(compensation, failure, notice).await
            }
        }
    }

    /// Show `content` at once under a temporary id, then swap in the
    /// server's entity. Blank or oversized content never reaches the network.
    #[instrument(skip(self, content), fields(parent = %self.config.parent))]
    pub async fn submit(
        &self,
        author: &UserId,
        content: &str,
        placement: Placement,
    ) -> Result<MutationStatus, DomainError> {
        let body = CommentBody::new(content)?;
        if self.is_cancelled() {
            return Ok(MutationStatus::Discarded);
        }
        let placeholder = VotableEntity::placeholder(
            self.config.child_kind,
            author.clone(),
            body.as_str().to_string(),
        );
        let temp_id = placeholder.id.clone();

        let compensation = {
            let mut loader = self.loader();
            Mutation::Submit {
                placeholder,
                placement,
            }
            .apply(loader.thread_mut())
        };
        let Some(compensation) = compensation else {
            return Ok(MutationStatus::Missing);
        };

        let outcome = self
            .guarded(
                self.backend
                    .submit(&self.config.parent, self.config.child_kind, &body),
            )
            .await;

        let status = match outcome.into_data() {
            Ok(entity) => {
                let mut loader = self.loader();
                applier::reconcile(loader.thread_mut(), &temp_id, entity);
                MutationStatus::Confirmed
            }
            Err(failure) => {
                let parent = self.config.parent.clone();
                let notice = |message| Notice::SubmissionFailed { parent, message };
                self.settle_failure(compensation, failure, notice).await
            }
        };
        Ok(status)
    }

    #[instrument(skip(self, content), fields(parent = %self.config.parent))]
    pub async fn edit(&self, id: &EntityId, content: &str) -> Result<MutationStatus, DomainError> {
        let body = CommentBody::new(content)?;
        if self.is_cancelled() {
            return Ok(MutationStatus::Discarded);
        }
        let Some(_guard) = self.guards.try_acquire(id) else {
            debug!(id = %id, "mutation already pending, dropping edit");
            return Ok(MutationStatus::Dropped);
        };

        let Some((key, compensation)) = self.apply_to(
            id,
            Mutation::Edit {
                target: id.clone(),
                content: body.as_str().to_string(),
            },
        ) else {
            return Ok(MutationStatus::Missing);
        };

        let outcome = self.guarded(self.backend.edit(&key, &body)).await;
        let status = match outcome.into_data() {
            Ok(entity) => {
                let mut loader = self.loader();
                applier::reconcile(loader.thread_mut(), id, entity);
                MutationStatus::Confirmed
            }
            Err(failure) => {
                let notice = |message| Notice::MutationRejected {
                    target: key.clone(),
                    action: "edit",
                    message,
                };
                self.settle_failure(compensation, failure, notice).await
            }
        };
        Ok(status)
    }

    #[instrument(skip(self), fields(parent = %self.config.parent))]
    pub async fn delete(&self, id: &EntityId) -> MutationStatus {
        if self.is_cancelled() {
            return MutationStatus::Discarded;
        }
        let Some(_guard) = self.guards.try_acquire(id) else {
            debug!(id = %id, "mutation already pending, dropping delete");
            return MutationStatus::Dropped;
        };

        let Some((key, compensation)) = self.apply_to(id, Mutation::Delete { target: id.clone() })
        else {
            return MutationStatus::Missing;
        };

        let outcome = self.guarded(self.backend.delete(&key)).await;
        match outcome.into_result() {
            Ok(_) => MutationStatus::Confirmed,
            Err(failure) => {
                let notice = |message| Notice::MutationRejected {
                    target: key.clone(),
                    action: "delete",
                    message,
                };
                self.settle_failure(compensation, failure, notice).await
            }
        }
    }

    fn apply_to(&self, id: &EntityId, mutation: Mutation) -> Option<(CompositeKey, Compensation)> {
        let mut loader = self.loader();
        let thread = loader.thread_mut();
        let key = thread.get(id).map(Keyed::key)?;
        let compensation = mutation.apply(thread)?;
        Some((key, compensation))
    }

    async fn settle_failure(
        &self,
        compensation: Compensation,
        failure: Failure,
        notice: impl FnOnce(String) -> Notice,
    ) -> MutationStatus {
        if failure.kind == FailureKind::Cancelled {
            debug!("response arrived after cancellation, discarding");
            return MutationStatus::Discarded;
        }

        compensation.apply(self.loader().thread_mut());
        warn!(failure = %failure, "mutation rolled back");
        self.notices.publish(notice(user_message(&failure)));

        if failure.kind == FailureKind::Transport {
            self.refresh_after_failure().await;
        }
        MutationStatus::RolledBack(failure)
    }
}

fn user_message(failure: &Failure) -> String {
    failure
        .message
        .clone()
        .unwrap_or_else(|| default_message(failure.kind).to_string())
}
