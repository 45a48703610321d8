mod error;
mod name;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use name::{validate_container, validate_object_name};
pub use traits::{BoxReader, ContentStore, StoredObject};
