//! Page-by-page accumulation of a listing.
//!
//! Loads for one collection are serialized: [`PaginatedLoader::begin`] hands
//! out at most one [`PageTicket`] at a time, and the ticket must come back
//! through [`PaginatedLoader::complete`] or [`PaginatedLoader::fail`].

use crate::domain::shared::identity::{CompositeKey, Keyed};
use crate::domain::shared::pagination::{LoadState, PageCursor, PageMeta};
use crate::domain::social::thread::Thread;
use std::collections::HashSet;
use tracing::debug;

/// Permission to fetch one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct PageTicket {
    pub page: u32,
    reset: bool,
    prior: LoadState,
}

#[derive(Debug, Clone)]
pub struct PaginatedLoader<T> {
    thread: Thread<T>,
    cursor: PageCursor,
    state: LoadState,
    refresh_deferred: bool,
}

impl<T: Keyed + Clone> Default for PaginatedLoader<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Keyed + Clone> PaginatedLoader<T> {
    pub fn new() -> Self {
        Self {
            thread: Thread::new(),
            cursor: PageCursor::default(),
            state: LoadState::Idle,
            refresh_deferred: false,
        }
    }

    pub fn thread(&self) -> &Thread<T> {
        &self.thread
    }

    pub fn thread_mut(&mut self) -> &mut Thread<T> {
        &mut self.thread
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn next_page(&self) -> u32 {
        self.cursor.page + 1
    }

    /// Claim the right to fetch `page`.
    ///
    /// Refused while another load is in flight, and for pages past the first
    /// once the collection is exhausted. Page 1 on a loaded collection is a
    /// refresh: its result replaces the accumulated entries.
    pub fn begin(&mut self, page: u32) -> Option<PageTicket> {
        if self.cursor.loading_more {
            debug!(page, "page load already in flight");
            return None;
        }
        let page = page.max(1);
        if page > 1 && !self.cursor.has_more {
            debug!(page, "collection exhausted");
            return None;
        }

        let ticket = PageTicket {
            page,
            reset: page == 1 && self.state != LoadState::Idle,
            prior: self.state,
        };
        self.cursor.loading_more = true;
        self.state = if page == 1 {
            LoadState::Loading
        } else {
            LoadState::LoadingMore
        };
        Some(ticket)
    }

    /// Claim a page-1 refetch, or remember it for when the load in flight
    /// hands its ticket back.
    pub fn begin_refresh(&mut self) -> Option<PageTicket> {
        if self.cursor.loading_more {
            debug!("page load in flight, deferring refresh");
            self.refresh_deferred = true;
            return None;
        }
        self.begin(1)
    }

    /// The deferred refresh, once no load is in flight.
    pub fn take_deferred_refresh(&mut self) -> Option<PageTicket> {
        if !self.refresh_deferred || self.cursor.loading_more {
            return None;
        }
        self.refresh_deferred = false;
        self.begin(1)
    }

    pub fn has_deferred_refresh(&self) -> bool {
        self.refresh_deferred
    }

    /// Merge a fetched page; returns how many new entries landed.
    pub fn complete(&mut self, ticket: PageTicket, items: Vec<T>, meta: PageMeta) -> usize {
        if ticket.reset {
            self.thread.clear();
        }
        let added = self.thread.extend_unique(items);
        self.thread.set_total(meta.total);

        self.cursor.page = ticket.page;
        self.cursor.has_more = meta.has_more_after(ticket.page);
        self.cursor.loading_more = false;
        self.state = if self.cursor.has_more {
            LoadState::Loaded
        } else {
            LoadState::Exhausted
        };
        debug!(
            page = ticket.page,
            pages = meta.pages,
            added,
            has_more = self.cursor.has_more,
            "page merged"
        );
        added
    }

    /// Abandon a load without advancing the page, so it can be retried.
    pub fn fail(&mut self, ticket: PageTicket) {
        self.cursor.loading_more = false;
        self.state = ticket.prior;
    }
}

/// Merge results of independent queries, keeping the first of each key.
pub fn merge_unique<T: Keyed>(first: Vec<T>, second: Vec<T>) -> Vec<T> {
    let mut seen: HashSet<CompositeKey> = HashSet::with_capacity(first.len() + second.len());
    first
        .into_iter()
        .chain(second)
        .filter(|item| seen.insert(item.key()))
        .collect()
}
