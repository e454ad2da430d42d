pub mod entity;
pub mod media;
pub mod reactions;
pub mod thread;
pub mod value_objects;
