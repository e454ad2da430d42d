use crate::domain::shared::identity::EntityId;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Per-entity "mutation pending" markers.
///
/// A second mutation on an entity whose marker is set is dropped, not
/// queued. Markers of different entities never contend.
#[derive(Debug, Clone, Default)]
pub struct InFlightGuards {
    active: Arc<Mutex<HashSet<EntityId>>>,
}

impl InFlightGuards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self, id: &EntityId) -> Option<InFlightGuard> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if !active.insert(id.clone()) {
            return None;
        }
        Some(InFlightGuard {
            id: id.clone(),
            active: Arc::clone(&self.active),
        })
    }

    pub fn is_active(&self, id: &EntityId) -> bool {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }
}

/// Releases its marker when dropped, whatever the mutation's outcome.
#[derive(Debug)]
pub struct InFlightGuard {
    id: EntityId,
    active: Arc<Mutex<HashSet<EntityId>>>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}
