pub mod client;
pub mod errors;
pub mod routes;
pub mod traits;
