//! Tusla Storage Library
//!
//! Object storage for uploaded images. The `Storage` trait abstracts the
//! backend; the S3 implementation targets AWS S3 and S3-compatible providers
//! such as MinIO.

pub mod keys;
pub mod s3;
pub mod traits;

pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
