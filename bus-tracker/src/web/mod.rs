//! Web layer for the bus tracker.
//!
//! Serves the page, accepts the rider's selections as form posts and
//! exposes the current view as JSON for the map script.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, SESSION_COOKIE, create_router};
pub use state::AppState;
pub use templates::*;
