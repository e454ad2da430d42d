use crate::domain::shared::identity::{CompositeKey, EntityId, Keyed};
use std::collections::HashSet;

/// Where a new entry lands in a thread's display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Newest first (replies under a review).
    Prepend,
    /// Oldest first (comments under a post).
    Append,
}

/// Ordered entries under one parent plus the cached server-side count.
///
/// No two entries share a [`CompositeKey`].
#[derive(Debug, Clone, PartialEq)]
pub struct Thread<T> {
    entries: Vec<T>,
    total: u64,
}

/// A full copy of a thread taken before a speculative change.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadSnapshot<T> {
    entries: Vec<T>,
    total: u64,
}

impl<T> Default for Thread<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            total: 0,
        }
    }
}

impl<T: Keyed + Clone> Thread<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a thread from already-fetched entries, dropping duplicate keys.
    pub fn from_entries(entries: Vec<T>, total: u64) -> Self {
        let mut thread = Self::new();
        thread.extend_unique(entries);
        thread.total = total;
        thread
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn set_total(&mut self, total: u64) {
        self.total = total;
    }

    pub fn contains(&self, key: &CompositeKey) -> bool {
        self.entries.iter().any(|entry| &entry.key() == key)
    }

    pub fn position(&self, id: &EntityId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id() == id)
    }

    pub fn get(&self, id: &EntityId) -> Option<&T> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    pub fn get_mut(&mut self, id: &EntityId) -> Option<&mut T> {
        self.entries.iter_mut().find(|entry| entry.id() == id)
    }

    /// Append entries whose key is not present yet; returns how many landed.
    pub fn extend_unique(&mut self, items: impl IntoIterator<Item = T>) -> usize {
        let mut seen: HashSet<CompositeKey> = self.entries.iter().map(Keyed::key).collect();
        let before = self.entries.len();
        for item in items {
            if seen.insert(item.key()) {
                self.entries.push(item);
            }
        }
        self.entries.len() - before
    }

    /// Place a new entry and bump the cached count. Refused if the key exists.
    pub fn place(&mut self, entry: T, placement: Placement) -> bool {
        if self.contains(&entry.key()) {
            return false;
        }
        match placement {
            Placement::Prepend => self.entries.insert(0, entry),
            Placement::Append => self.entries.push(entry),
        }
        self.total += 1;
        true
    }

    /// Insert at `index` (clamped to the end) and bump the cached count.
    pub fn insert_at(&mut self, index: usize, entry: T) -> bool {
        if self.contains(&entry.key()) {
            return false;
        }
        let index = index.min(self.entries.len());
        self.entries.insert(index, entry);
        self.total += 1;
        true
    }

    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        if index >= self.entries.len() {
            return None;
        }
        self.total = self.total.saturating_sub(1);
        Some(self.entries.remove(index))
    }

    /// Swap the entry at `index` for `entry`. A replacement whose key already
    /// sits elsewhere in the thread removes the slot instead.
    pub fn replace_at(&mut self, index: usize, entry: T) -> Option<T> {
        if index >= self.entries.len() {
            return None;
        }
        let key = entry.key();
        let duplicate = self
            .entries
            .iter()
            .enumerate()
            .any(|(i, existing)| i != index && existing.key() == key);
        if duplicate {
            self.total = self.total.saturating_sub(1);
            return Some(self.entries.remove(index));
        }
        Some(std::mem::replace(&mut self.entries[index], entry))
    }

    /// Drop matching entries and decrement the cached count for each.
    pub fn remove_matching(&mut self, predicate: impl Fn(&T) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| !predicate(entry));
        let removed = before - self.entries.len();
        self.total = self.total.saturating_sub(removed as u64);
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.total = 0;
    }

    pub fn snapshot(&self) -> ThreadSnapshot<T> {
        ThreadSnapshot {
            entries: self.entries.clone(),
            total: self.total,
        }
    }

    pub fn restore(&mut self, snapshot: ThreadSnapshot<T>) {
        self.entries = snapshot.entries;
        self.total = snapshot.total;
    }
}
