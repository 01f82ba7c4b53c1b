//! Tusla API library
//!
//! HTTP handlers, auth middleware, and application setup. The binary in
//! `main.rs` wires these together; integration tests build the router
//! directly from here.

pub mod api_doc;
pub mod auth;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod utils;
pub mod validation;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
