// Public API - what other modules can use
pub use handlers::{get_profile, update_profile};
pub use types::ProfileResponse;

pub mod handlers;
pub mod models;
pub mod repository;
pub mod types;
