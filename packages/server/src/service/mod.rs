//! Podcast/episode orchestration.
//!
//! Every owner-scoped operation takes the caller identity and answers
//! `NotFound` both for missing records and for records owned by someone else.

pub mod stats;

use std::sync::Arc;

use chrono::Utc;
use common::storage::{BoxReader, ContentStore, StorageError};
use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::models::episode::DEFAULT_MIME_TYPE;
use crate::models::podcast::DEFAULT_LANGUAGE;
use crate::models::shared::validate_title;
use crate::models::{Episode, Podcast, PodcastStats};
use crate::repository::{PodcastRepository, RepositoryError};
use crate::utils::filename::{audio_extension, validate_flat_filename};

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Absent, or not owned by the caller.
    #[error("{0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Reserved. Ownership failures currently surface as `NotFound`.
    #[error("Forbidden")]
    Forbidden,

    #[error("Persistence error: {0}")]
    Persistence(#[from] RepositoryError),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

fn podcast_not_found() -> ServiceError {
    ServiceError::NotFound("Podcast not found".into())
}

fn episode_not_found() -> ServiceError {
    ServiceError::NotFound("Episode not found".into())
}

/// Settings the service needs from configuration.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Content store container holding episode audio.
    pub audio_container: String,
    /// Externally visible base URL, used to derive feed URLs.
    pub public_url: String,
}

/// An audio payload handed to the service.
pub struct AudioUpload {
    pub content: BoxReader,
    /// Declared MIME type. Empty means `audio/mpeg`.
    pub content_type: String,
    /// Original client-side file name, if any.
    pub file_name: Option<String>,
}

/// Stored audio opened for reading.
pub struct AudioStream {
    pub content: BoxReader,
    pub content_type: String,
    pub size: u64,
    pub file_name: String,
}

/// Stateless orchestration over a persistence port and a content store.
///
/// Cheap to clone; holds no per-request state.
#[derive(Clone)]
pub struct PodcastService {
    repo: Arc<dyn PodcastRepository>,
    store: Arc<dyn ContentStore>,
    settings: ServiceSettings,
}

impl PodcastService {
    pub fn new(
        repo: Arc<dyn PodcastRepository>,
        store: Arc<dyn ContentStore>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            repo,
            store,
            settings,
        }
    }

    fn rss_url(&self, podcast_id: &str) -> String {
        format!(
            "{}/feeds/{podcast_id}/rss",
            self.settings.public_url.trim_end_matches('/')
        )
    }

    /// Load a podcast the caller owns.
    async fn owned_podcast(&self, podcast_id: &str, user_id: &str) -> Result<Podcast> {
        match self.repo.find_podcast(podcast_id).await? {
            Some(podcast) if podcast.owner_id == user_id => Ok(podcast),
            _ => Err(podcast_not_found()),
        }
    }

    /// Load an episode under a podcast the caller owns.
    async fn owned_episode(
        &self,
        podcast_id: &str,
        episode_id: &str,
        user_id: &str,
    ) -> Result<Episode> {
        self.owned_podcast(podcast_id, user_id).await?;
        self.repo
            .find_episode(podcast_id, episode_id)
            .await?
            .ok_or_else(episode_not_found)
    }

    /// Upload audio under a fresh object name for `(podcast_id, episode_id)`.
    ///
    /// Returns the object name alongside what the store recorded.
    async fn store_audio(
        &self,
        podcast_id: &str,
        episode_id: &str,
        audio: AudioUpload,
    ) -> Result<StoredAudio> {
        let content_type = match audio.content_type.trim() {
            "" => DEFAULT_MIME_TYPE.to_string(),
            declared => declared.to_ascii_lowercase(),
        };

        let file_name = match audio.file_name.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(name) => Some(
                validate_flat_filename(name)
                    .map_err(|e| ServiceError::InvalidInput(e.message().into()))?
                    .to_string(),
            ),
        };

        let ext = audio_extension(&content_type, file_name.as_deref())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();
        let object = format!("{podcast_id}/{episode_id}/{}{ext}", Uuid::now_v7().simple());
        let file_name = file_name.unwrap_or_else(|| format!("{episode_id}{ext}"));

        let container = &self.settings.audio_container;
        self.store.ensure_container(container).await?;
        let stored = match self
            .store
            .upload_file(container, &object, audio.content, &content_type)
            .await
        {
            Ok(stored) => stored,
            Err(e) => {
                // A failed upload may still have left bytes behind.
                self.discard_audio(&object).await;
                return Err(e.into());
            }
        };

        Ok(StoredAudio {
            object,
            file_name,
            url: stored.url,
            size: stored.size,
            content_type: stored.content_type,
        })
    }

    /// Best-effort removal of an audio object.
    ///
    /// An already-absent object counts as removed. Other failures are logged
    /// and left for out-of-band reconciliation.
    async fn discard_audio(&self, object: &str) {
        if object.is_empty() {
            return;
        }
        match self
            .store
            .delete_file(&self.settings.audio_container, object)
            .await
        {
            Ok(()) | Err(StorageError::NotFound(_)) => {}
            Err(e) => warn!(object, error = %e, "Failed to delete audio object"),
        }
    }

    async fn open_audio(&self, episode: &Episode) -> Result<AudioStream> {
        if episode.audio_object.is_empty() {
            return Err(ServiceError::NotFound("Audio not found".into()));
        }
        let content = self
            .store
            .download_file(&self.settings.audio_container, &episode.audio_object)
            .await
            .map_err(|e| match e {
                StorageError::NotFound(_) => ServiceError::NotFound("Audio not found".into()),
                other => ServiceError::Storage(other),
            })?;

        Ok(AudioStream {
            content,
            content_type: episode.mime_type.clone(),
            size: episode.file_size,
            file_name: episode.audio_file_name.clone(),
        })
    }

    #[instrument(skip(self))]
    pub async fn list_podcasts(&self, user_id: &str) -> Result<Vec<Podcast>> {
        Ok(self.repo.list_podcasts(user_id).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_podcast(&self, podcast_id: &str, user_id: &str) -> Result<Podcast> {
        self.owned_podcast(podcast_id, user_id).await
    }

    /// Create a podcast owned by `user_id`.
    ///
    /// Any id, owner, timestamps or feed URL in `input` are ignored.
    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create_podcast(&self, input: Podcast, user_id: &str) -> Result<Podcast> {
        validate_title(&input.title)?;

        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        let mut podcast = Podcast {
            rss_url: self.rss_url(&id),
            id,
            owner_id: user_id.to_string(),
            created_at: now,
            updated_at: now,
            ..Default::default()
        };
        podcast.merge_from(input);
        if podcast.language.trim().is_empty() {
            podcast.language = DEFAULT_LANGUAGE.to_string();
        }

        self.repo.insert_podcast(&podcast).await?;
        info!(podcast_id = %podcast.id, "Podcast created");
        Ok(podcast)
    }

    /// Replace the editable fields of an owned podcast.
    #[instrument(skip(self, input))]
    pub async fn update_podcast(
        &self,
        podcast_id: &str,
        input: Podcast,
        user_id: &str,
    ) -> Result<Podcast> {
        validate_title(&input.title)?;

        let mut podcast = self.owned_podcast(podcast_id, user_id).await?;
        podcast.merge_from(input);
        if podcast.language.trim().is_empty() {
            podcast.language = DEFAULT_LANGUAGE.to_string();
        }
        podcast.updated_at = Utc::now();

        if !self.repo.update_podcast(&podcast).await? {
            return Err(podcast_not_found());
        }
        Ok(podcast)
    }

    /// Delete a podcast, its episodes, then their audio.
    ///
    /// Records go first so a failure part-way can only orphan audio objects.
    #[instrument(skip(self))]
    pub async fn delete_podcast(&self, podcast_id: &str, user_id: &str) -> Result<()> {
        self.owned_podcast(podcast_id, user_id).await?;

        let removed = self.repo.delete_podcast(podcast_id).await?;
        for episode in &removed {
            self.discard_audio(&episode.audio_object).await;
        }

        info!(episodes = removed.len(), "Podcast deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_episodes(&self, podcast_id: &str, user_id: &str) -> Result<Vec<Episode>> {
        self.owned_podcast(podcast_id, user_id).await?;
        Ok(self.repo.list_episodes(podcast_id).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_episode(
        &self,
        podcast_id: &str,
        episode_id: &str,
        user_id: &str,
    ) -> Result<Episode> {
        self.owned_episode(podcast_id, episode_id, user_id).await
    }

    /// Upload the audio, then persist the episode.
    ///
    /// Nothing is persisted if the upload fails. If persisting fails the
    /// uploaded object is removed again.
    #[instrument(skip(self, input, audio), fields(title = %input.title))]
    pub async fn create_episode(
        &self,
        podcast_id: &str,
        input: Episode,
        audio: Option<AudioUpload>,
        user_id: &str,
    ) -> Result<Episode> {
        self.owned_podcast(podcast_id, user_id).await?;
        let audio =
            audio.ok_or_else(|| ServiceError::InvalidInput("Audio file is required".into()))?;
        validate_title(&input.title)?;

        let episode_id = Uuid::new_v4().to_string();
        let stored = self.store_audio(podcast_id, &episode_id, audio).await?;

        let now = Utc::now();
        let initial_downloads = input.download_count;
        let mut episode = Episode {
            id: episode_id,
            podcast_id: podcast_id.to_string(),
            audio_url: stored.url,
            audio_file_name: stored.file_name,
            audio_object: stored.object,
            file_size: stored.size,
            mime_type: stored.content_type,
            download_count: initial_downloads,
            created_at: now,
            updated_at: now,
            ..Default::default()
        };
        episode.merge_metadata(input);

        if let Err(e) = self.repo.insert_episode(&episode).await {
            self.discard_audio(&episode.audio_object).await;
            return Err(e.into());
        }

        info!(episode_id = %episode.id, size = episode.file_size, "Episode created");
        Ok(episode)
    }

    /// Replace the editable metadata of an episode. Audio is untouched.
    #[instrument(skip(self, input))]
    pub async fn update_episode(
        &self,
        podcast_id: &str,
        episode_id: &str,
        input: Episode,
        user_id: &str,
    ) -> Result<Episode> {
        validate_title(&input.title)?;

        let mut episode = self.owned_episode(podcast_id, episode_id, user_id).await?;
        episode.merge_metadata(input);
        episode.updated_at = Utc::now();

        self.repo
            .update_episode(&episode)
            .await?
            .ok_or_else(episode_not_found)
    }

    /// Swap an episode's audio.
    ///
    /// The new object is uploaded and recorded before the old one is deleted.
    #[instrument(skip(self, audio))]
    pub async fn replace_episode_audio(
        &self,
        podcast_id: &str,
        episode_id: &str,
        audio: AudioUpload,
        user_id: &str,
    ) -> Result<Episode> {
        let mut episode = self.owned_episode(podcast_id, episode_id, user_id).await?;
        let previous_object = episode.audio_object.clone();

        let stored = self.store_audio(podcast_id, episode_id, audio).await?;
        episode.audio_url = stored.url;
        episode.audio_file_name = stored.file_name;
        episode.audio_object = stored.object;
        episode.file_size = stored.size;
        episode.mime_type = stored.content_type;
        episode.updated_at = Utc::now();

        let updated = match self.repo.update_episode(&episode).await {
            Ok(Some(updated)) => updated,
            outcome => {
                self.discard_audio(&episode.audio_object).await;
                return match outcome {
                    Err(e) => Err(e.into()),
                    _ => Err(episode_not_found()),
                };
            }
        };

        if previous_object != updated.audio_object {
            self.discard_audio(&previous_object).await;
        }
        info!(size = updated.file_size, "Episode audio replaced");
        Ok(updated)
    }

    /// Delete the episode record, then its audio.
    #[instrument(skip(self))]
    pub async fn delete_episode(
        &self,
        podcast_id: &str,
        episode_id: &str,
        user_id: &str,
    ) -> Result<()> {
        let episode = self.owned_episode(podcast_id, episode_id, user_id).await?;

        if !self.repo.delete_episode(podcast_id, episode_id).await? {
            return Err(episode_not_found());
        }
        self.discard_audio(&episode.audio_object).await;

        info!("Episode deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_episode_audio(
        &self,
        podcast_id: &str,
        episode_id: &str,
        user_id: &str,
    ) -> Result<AudioStream> {
        let episode = self.owned_episode(podcast_id, episode_id, user_id).await?;
        self.open_audio(&episode).await
    }

    #[instrument(skip(self))]
    pub async fn get_episode_audio_url(
        &self,
        podcast_id: &str,
        episode_id: &str,
        user_id: &str,
    ) -> Result<String> {
        let episode = self.owned_episode(podcast_id, episode_id, user_id).await?;
        if episode.audio_object.is_empty() {
            return Err(ServiceError::NotFound("Audio not found".into()));
        }
        Ok(self
            .store
            .get_url(&self.settings.audio_container, &episode.audio_object)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get_podcast_stats(&self, podcast_id: &str, user_id: &str) -> Result<PodcastStats> {
        let podcast = self.owned_podcast(podcast_id, user_id).await?;
        let episodes = self.repo.list_episodes(podcast_id).await?;
        Ok(stats::aggregate(&podcast.id, &episodes, Utc::now()))
    }

    /// Count one download of an episode. Not owner-scoped.
    #[instrument(skip(self))]
    pub async fn record_download(&self, podcast_id: &str, episode_id: &str) -> Result<Episode> {
        self.repo
            .increment_downloads(podcast_id, episode_id)
            .await?
            .ok_or_else(episode_not_found)
    }

    /// Open an episode's audio for an anonymous listener and count the download.
    ///
    /// The counter only moves once the audio has been opened successfully.
    #[instrument(skip(self))]
    pub async fn listen(&self, podcast_id: &str, episode_id: &str) -> Result<AudioStream> {
        let episode = self
            .repo
            .find_episode(podcast_id, episode_id)
            .await?
            .ok_or_else(episode_not_found)?;
        let stream = self.open_audio(&episode).await?;
        self.record_download(podcast_id, episode_id).await?;
        Ok(stream)
    }
}

struct StoredAudio {
    object: String,
    file_name: String,
    url: String,
    size: u64,
    content_type: String,
}
