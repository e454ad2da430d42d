pub mod discovery;
pub mod optimistic;
pub mod pagination;
pub mod social;
