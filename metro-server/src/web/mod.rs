//! Web layer for the metro route planner.
//!
//! JSON endpoints for listing stations, planning routes and quoting fares.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
