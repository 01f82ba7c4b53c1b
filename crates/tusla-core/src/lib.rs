//! Tusla Core Library
//!
//! This crate provides core domain models, error types, configuration, and
//! shared constants used across all Tusla components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
