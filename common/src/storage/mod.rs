// Object storage gateway: signed read URLs and raw object reads

pub mod s3_client;

pub use s3_client::S3ObjectStore;

use crate::errors::StorageError;
use async_trait::async_trait;

/// Read-side object storage operations
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Issue a time-limited GET URL for `key`
    async fn presign_get(&self, key: &str, expiry_secs: u32) -> Result<String, StorageError>;

    /// Fetch the full contents of `key`
    async fn get_object(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Sign an optional key; null or empty keys yield `None` without a
    /// signing call.
    async fn presign_optional(
        &self,
        key: Option<&str>,
        expiry_secs: u32,
    ) -> Result<Option<String>, StorageError> {
        match key {
            Some(key) if !key.is_empty() => self.presign_get(key, expiry_secs).await.map(Some),
            _ => Ok(None),
        }
    }
}
