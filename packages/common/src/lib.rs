pub mod config;
pub mod storage;

pub use config::StorageAppConfig;
pub use storage::{BoxReader, ContentStore, StorageError, StoredObject};
