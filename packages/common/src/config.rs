use std::path::PathBuf;

use serde::Deserialize;

/// App-level content store configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageAppConfig {
    /// Root directory for the filesystem store. Default: "./data/objects".
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,
    /// Base URL objects are served under. Default: "http://127.0.0.1:3000/media".
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Container holding episode audio. Default: "episodes".
    #[serde(default = "default_audio_container")]
    pub audio_container: String,
    /// Largest accepted object in bytes. Default: 512 MiB.
    #[serde(default = "default_max_object_size")]
    pub max_object_size: u64,
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("./data/objects")
}
fn default_public_base_url() -> String {
    "http://127.0.0.1:3000/media".into()
}
fn default_audio_container() -> String {
    "episodes".into()
}
fn default_max_object_size() -> u64 {
    512 * 1024 * 1024
}

impl Default for StorageAppConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            public_base_url: default_public_base_url(),
            audio_container: default_audio_container(),
            max_object_size: default_max_object_size(),
        }
    }
}
