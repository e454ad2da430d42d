//! Speculative state transitions over a thread.
//!
//! Everything here is synchronous and pure with respect to the network: the
//! session applies a transition the moment the user acts, and applies the
//! matching compensation if the server disagrees.

use crate::domain::shared::identity::{EntityId, Keyed, UserId};
use crate::domain::social::{
    entity::VotableEntity,
    thread::{Placement, Thread, ThreadSnapshot},
};
use tracing::debug;

pub fn toggle_like(entity: &VotableEntity, user: &UserId) -> VotableEntity {
    let mut next = entity.clone();
    next.reactions.toggle_like(user);
    next
}

pub fn toggle_dislike(entity: &VotableEntity, user: &UserId) -> VotableEntity {
    let mut next = entity.clone();
    next.reactions.toggle_dislike(user);
    next
}

/// Show a placeholder before the server has seen it.
pub fn insert_optimistic<T: Keyed + Clone>(
    thread: &mut Thread<T>,
    placeholder: T,
    placement: Placement,
) -> bool {
    thread.place(placeholder, placement)
}

/// Swap the placeholder `temp_id` for the server's entity.
///
/// When the placeholder is already gone the server entity is dropped, so an
/// action the user backed out of is not brought back.
pub fn reconcile<T: Keyed + Clone>(
    thread: &mut Thread<T>,
    temp_id: &EntityId,
    server_entity: T,
) -> bool {
    match thread.position(temp_id) {
        Some(index) => {
            thread.replace_at(index, server_entity);
            true
        }
        None => {
            debug!(temp_id = %temp_id, "placeholder no longer present, dropping server entity");
            false
        }
    }
}

pub enum Rollback<T> {
    Snapshot(ThreadSnapshot<T>),
    Matching(Box<dyn Fn(&T) -> bool + Send + Sync>),
}

impl<T: Keyed + 'static> Rollback<T> {
    /// Remove every placeholder still in the thread.
    pub fn temporary() -> Self {
        Rollback::Matching(Box::new(|entry: &T| entry.id().is_temporary()))
    }
}

/// Undo speculative changes; returns how many entries were dropped.
pub fn rollback<T: Keyed + Clone>(thread: &mut Thread<T>, rollback: Rollback<T>) -> usize {
    match rollback {
        Rollback::Snapshot(snapshot) => {
            thread.restore(snapshot);
            0
        }
        Rollback::Matching(predicate) => thread.remove_matching(predicate),
    }
}

/// An entry taken out of a thread, remembered with its neighbours.
///
/// The neighbours place it back correctly even when other entries were
/// inserted or removed meanwhile; `index` is only the last resort.
#[derive(Debug, Clone, PartialEq)]
pub struct Removed<T> {
    pub index: usize,
    pub previous: Option<EntityId>,
    pub next: Option<EntityId>,
    pub entry: T,
}

pub fn remove_entry<T: Keyed + Clone>(thread: &mut Thread<T>, id: &EntityId) -> Option<Removed<T>> {
    let index = thread.position(id)?;
    let neighbour = |i: usize| thread.entries().get(i).map(|e| e.id().clone());
    let previous = index.checked_sub(1).and_then(neighbour);
    let next = neighbour(index + 1);
    let entry = thread.remove_at(index)?;
    Some(Removed {
        index,
        previous,
        next,
        entry,
    })
}

/// Put a removed entry back between the neighbours it had.
pub fn restore_entry<T: Keyed + Clone>(thread: &mut Thread<T>, removed: Removed<T>) -> bool {
    let index = removed
        .previous
        .as_ref()
        .and_then(|id| thread.position(id))
        .map(|i| i + 1)
        .or_else(|| removed.next.as_ref().and_then(|id| thread.position(id)))
        .unwrap_or(removed.index);
    thread.insert_at(index, removed.entry)
}

/// Replace an entry's text; returns the previous text and edit time.
pub fn replace_content(
    thread: &mut Thread<VotableEntity>,
    id: &EntityId,
    content: String,
) -> Option<(String, Option<chrono::DateTime<chrono::Utc>>)> {
    let entry = thread.get_mut(id)?;
    let previous = std::mem::replace(&mut entry.content, content);
    let previous_edit = entry.edited_at.replace(chrono::Utc::now());
    Some((previous, previous_edit))
}
