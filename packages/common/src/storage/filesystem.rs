use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};

use super::error::StorageError;
use super::name::{validate_container, validate_object_name};
use super::traits::{BoxReader, ContentStore, StoredObject};

/// Filesystem-backed content store.
///
/// Containers are directories directly under `root`; object names map to
/// relative paths inside them:
/// `{root}/{container}/{name segments...}`
pub struct FilesystemContentStore {
    root: PathBuf,
    public_base_url: String,
    max_size: u64,
}

impl FilesystemContentStore {
    /// Create a new filesystem content store.
    pub async fn new(
        root: PathBuf,
        public_base_url: impl Into<String>,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        fs::create_dir_all(&root).await?;
        fs::create_dir_all(root.join(".tmp")).await?;
        Ok(Self {
            root,
            public_base_url: public_base_url.into(),
            max_size,
        })
    }

    fn container_path(&self, container: &str) -> Result<PathBuf, StorageError> {
        validate_container(container)?;
        Ok(self.root.join(container))
    }

    /// Compute the filesystem path for an object.
    fn object_path(&self, container: &str, name: &str) -> Result<PathBuf, StorageError> {
        validate_object_name(name)?;
        let mut path = self.container_path(container)?;
        for segment in name.split('/') {
            path.push(segment);
        }
        Ok(path)
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.root
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }

    async fn require_container(&self, container: &str) -> Result<PathBuf, StorageError> {
        let path = self.container_path(container)?;
        if !fs::try_exists(&path).await? {
            return Err(StorageError::NotFound(format!("container {container}")));
        }
        Ok(path)
    }

    /// Stream `reader` into a fresh temp file, enforcing the size limit.
    async fn spool(&self, mut reader: BoxReader) -> Result<(PathBuf, u64), StorageError> {
        let temp_path = self.temp_path();
        let mut temp_file = fs::File::create(&temp_path).await?;
        let mut total_bytes: u64 = 0;
        let mut buf = vec![0u8; 64 * 1024];

        let result = async {
            loop {
                let n = reader.read(&mut buf).await?;
                if n == 0 {
                    break;
                }

                total_bytes += n as u64;
                if total_bytes > self.max_size {
                    return Err(StorageError::SizeLimitExceeded {
                        actual: total_bytes,
                        limit: self.max_size,
                    });
                }

                temp_file.write_all(&buf[..n]).await?;
            }
            temp_file.flush().await?;
            Ok(())
        }
        .await;
        drop(temp_file);

        match result {
            Ok(()) => Ok((temp_path, total_bytes)),
            Err(e) => {
                let _ = fs::remove_file(&temp_path).await;
                Err(e)
            }
        }
    }
}

#[async_trait]
impl ContentStore for FilesystemContentStore {
    async fn upload_file(
        &self,
        container: &str,
        name: &str,
        content: BoxReader,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        let object_path = self.object_path(container, name)?;
        self.require_container(container).await?;

        let (temp_path, size) = self.spool(content).await?;

        if let Some(parent) = object_path.parent()
            && let Err(e) = fs::create_dir_all(parent).await
        {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&temp_path, &object_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        tracing::debug!(container, name, size, "Stored object");

        Ok(StoredObject {
            url: self.get_url(container, name).await?,
            size,
            content_type: content_type.to_string(),
        })
    }

    async fn download_file(
        &self,
        container: &str,
        name: &str,
    ) -> Result<BoxReader, StorageError> {
        let object_path = self.object_path(container, name)?;
        match fs::File::open(&object_path).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(format!("{container}/{name}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_file(&self, container: &str, name: &str) -> Result<(), StorageError> {
        let object_path = self.object_path(container, name)?;
        match fs::remove_file(&object_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(format!("{container}/{name}")));
            }
            Err(e) => return Err(e.into()),
        }

        // Prune now-empty intermediate directories, never the container itself.
        let container_path = self.container_path(container)?;
        let mut dir = object_path.parent().map(PathBuf::from);
        while let Some(current) = dir {
            if current == container_path || fs::remove_dir(&current).await.is_err() {
                break;
            }
            dir = current.parent().map(PathBuf::from);
        }

        Ok(())
    }

    async fn get_url(&self, container: &str, name: &str) -> Result<String, StorageError> {
        validate_container(container)?;
        validate_object_name(name)?;
        Ok(format!(
            "{}/{container}/{name}",
            self.public_base_url.trim_end_matches('/')
        ))
    }

    async fn exists(&self, container: &str, name: &str) -> Result<bool, StorageError> {
        let object_path = self.object_path(container, name)?;
        Ok(fs::try_exists(&object_path).await?)
    }

    async fn ensure_container(&self, container: &str) -> Result<(), StorageError> {
        let path = self.container_path(container)?;
        fs::create_dir_all(&path).await?;
        Ok(())
    }
}
