use std::io::Cursor;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// What the store kept after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Retrievable locator for the object.
    pub url: String,
    /// Number of bytes written.
    pub size: u64,
    /// Declared MIME type.
    pub content_type: String,
}

/// Durable object storage keyed by `(container, name)`.
///
/// Retries, if any, are the implementation's business. Callers see one
/// synchronous outcome per call.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Store a byte stream under `container/name`, replacing any previous object.
    async fn upload_file(
        &self,
        container: &str,
        name: &str,
        content: BoxReader,
        content_type: &str,
    ) -> Result<StoredObject, StorageError>;

    /// Store an in-memory buffer.
    async fn upload_bytes(
        &self,
        container: &str,
        name: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        let reader: BoxReader = Box::new(Cursor::new(data.to_vec()));
        self.upload_file(container, name, reader, content_type)
            .await
    }

    /// Open an object as a streaming async reader.
    async fn download_file(&self, container: &str, name: &str)
    -> Result<BoxReader, StorageError>;

    /// Read all bytes of an object.
    async fn download_bytes(&self, container: &str, name: &str) -> Result<Vec<u8>, StorageError> {
        let mut reader = self.download_file(container, name).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }

    /// Delete an object. Fails with `NotFound` if it is absent.
    async fn delete_file(&self, container: &str, name: &str) -> Result<(), StorageError>;

    /// Resolve a locator for the object without transferring bytes.
    async fn get_url(&self, container: &str, name: &str) -> Result<String, StorageError>;

    /// Check whether an object exists.
    async fn exists(&self, container: &str, name: &str) -> Result<bool, StorageError>;

    /// Create the container if missing. Safe to call repeatedly.
    async fn ensure_container(&self, container: &str) -> Result<(), StorageError>;
}
