use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::keys::public_url;
use crate::traits::{Storage, StorageError, StorageResult};

const DEFAULT_REGION: &str = "us-east-1";

/// S3 storage implementation
///
/// Works against AWS S3 or any S3-compatible provider. When a custom endpoint
/// is configured (MinIO, DigitalOcean Spaces) the client switches to
/// path-style addressing.
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    region: String,
    public_url_base: Option<String>,
}

impl S3Storage {
    pub async fn new(
        bucket: String,
        region: Option<String>,
        endpoint_url: Option<String>,
        public_url_base: Option<String>,
    ) -> StorageResult<Self> {
        if bucket.is_empty() {
            return Err(StorageError::ConfigError("Bucket name is empty".into()));
        }

        let region = region.unwrap_or_else(|| DEFAULT_REGION.to_string());

        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&config);
        if let Some(ref endpoint) = endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        // Without an explicit public base, compat endpoints serve objects
        // from the endpoint itself in path style.
        let public_url_base = public_url_base.or(endpoint_url);

        Ok(S3Storage {
            client: Client::from_conf(builder.build()),
            bucket,
            region,
            public_url_base,
        })
    }

    fn url_for(&self, key: &str) -> String {
        public_url(self.public_url_base.as_deref(), &self.bucket, &self.region, key)
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn upload(
        &self,
        key: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<String> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        let size = data.len() as u64;
        let start = std::time::Instant::now();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    "S3 upload failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(self.url_for(key))
    }
}
