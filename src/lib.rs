//! Client-side state core for the discovery platform: optimistic likes,
//! dislikes, replies, edits and deletes over paginated, de-duplicated
//! listings, reconciled against the JSON API.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
