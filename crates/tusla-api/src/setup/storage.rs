//! Object storage setup

use std::sync::Arc;

use anyhow::{Context, Result};

use tusla_core::Config;
use tusla_storage::{S3Storage, Storage};

/// Build the storage backend from configuration
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = S3Storage::new(
        config.s3_bucket.clone(),
        config.s3_region.clone(),
        config.s3_endpoint.clone(),
        config.s3_public_url_base.clone(),
    )
    .await
    .context("Failed to initialize object storage")?;

    tracing::info!(
        bucket = %config.s3_bucket,
        endpoint = config.s3_endpoint.as_deref().unwrap_or("aws"),
        "Object storage initialized"
    );

    Ok(Arc::new(storage))
}
