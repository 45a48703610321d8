//! Persistence port for podcasts and episodes.
//!
//! The service only talks to [`PodcastRepository`]; which backend sits behind
//! it is decided at startup.

mod memory;
mod sql;

use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;

use crate::models::{Episode, Podcast};

pub use memory::MemoryRepository;
pub use sql::SqlRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Keyed store for podcast and episode records.
///
/// Implementations provide their own concurrency control. Lists are returned
/// in a stable order: podcasts by creation time, episodes by publish date,
/// ties broken by id.
#[async_trait]
pub trait PodcastRepository: Send + Sync {
    async fn list_podcasts(&self, owner_id: &str) -> Result<Vec<Podcast>, RepositoryError>;

    async fn find_podcast(&self, podcast_id: &str) -> Result<Option<Podcast>, RepositoryError>;

    async fn insert_podcast(&self, podcast: &Podcast) -> Result<(), RepositoryError>;

    /// Overwrite a stored podcast. Returns `false` if it no longer exists.
    async fn update_podcast(&self, podcast: &Podcast) -> Result<bool, RepositoryError>;

    /// Remove a podcast and all of its episodes in one step.
    ///
    /// Returns the removed episodes so their audio can be cleaned up.
    async fn delete_podcast(&self, podcast_id: &str) -> Result<Vec<Episode>, RepositoryError>;

    async fn list_episodes(&self, podcast_id: &str) -> Result<Vec<Episode>, RepositoryError>;

    async fn find_episode(
        &self,
        podcast_id: &str,
        episode_id: &str,
    ) -> Result<Option<Episode>, RepositoryError>;

    async fn insert_episode(&self, episode: &Episode) -> Result<(), RepositoryError>;

    /// Overwrite a stored episode, keeping its stored download counter.
    ///
    /// Returns the record as stored, or `None` if it no longer exists.
    async fn update_episode(&self, episode: &Episode) -> Result<Option<Episode>, RepositoryError>;

    /// Returns `false` if there was nothing to delete.
    async fn delete_episode(
        &self,
        podcast_id: &str,
        episode_id: &str,
    ) -> Result<bool, RepositoryError>;

    /// Atomically add one to an episode's download counter.
    async fn increment_downloads(
        &self,
        podcast_id: &str,
        episode_id: &str,
    ) -> Result<Option<Episode>, RepositoryError>;
}
