pub mod shared;
pub mod social;
