//! Storage abstraction trait

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// Uploads are fire-and-forget objects addressed by key. The returned URL is
/// publicly reachable; the database stores URLs, not keys.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload data under the given key and return the public URL
    async fn upload(&self, key: &str, content_type: &str, data: Vec<u8>)
        -> StorageResult<String>;
}
