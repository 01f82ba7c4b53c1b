//! Repository and service initialization

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;

use tusla_core::Config;
use tusla_db::{
    CategoryRepository, PostImageRepository, PostRepository, PostVolunteerRepository,
    UserRepository,
};
use tusla_services::{CategorizerService, OllamaClient};
use tusla_storage::Storage;

use crate::state::AppState;

/// Build the shared application state from its parts
pub async fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let categories = CategoryRepository::new(pool.clone());

    let categorizer = match &config.ollama_model {
        Some(model) => {
            let ollama = OllamaClient::new(
                config.ollama_url.clone(),
                model.clone(),
                config.ollama_system_prompt.clone(),
            )
            .context("Failed to initialize Ollama client")?;

            // Reachability is informational only. The service degrades to
            // uncategorized posts when the model is down.
            match ollama.health_check().await {
                Ok(true) => tracing::info!(model = %model, "Categorization model reachable"),
                Ok(false) | Err(_) => {
                    tracing::warn!(
                        model = %model,
                        url = %config.ollama_url,
                        "Categorization model unreachable, posts will be created uncategorized"
                    );
                }
            }

            Some(CategorizerService::new(categories.clone(), ollama))
        }
        None => {
            tracing::info!("No OLLAMA_MODEL configured, categorization disabled");
            None
        }
    };

    Ok(Arc::new(AppState {
        users: UserRepository::new(pool.clone()),
        posts: PostRepository::new(pool.clone()),
        post_images: PostImageRepository::new(pool.clone()),
        volunteers: PostVolunteerRepository::new(pool.clone()),
        categories,
        storage,
        categorizer,
        config: config.clone(),
        pool,
    }))
}
