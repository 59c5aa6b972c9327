//! HTTP surface for the tutoring service

pub mod handlers;
pub mod models;
pub mod routes;

pub use handlers::AppState;
pub use models::{error_codes, error_response, ApiError};
pub use routes::build_router;
