//! Web layer for the fare service.
//!
//! JSON endpoints for registering stations, fares, and routes, and for
//! computing trip fares.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
