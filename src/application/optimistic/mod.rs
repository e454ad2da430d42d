pub mod applier;
pub mod mutation;
