//! Application setup and initialization
//!
//! All startup wiring lives here rather than in main.rs.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;

use tusla_core::Config;

use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    let pool = database::setup_database(&config).await?;

    let storage = storage::setup_storage(&config).await?;

    let state = services::initialize_services(&config, pool, storage).await?;

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
