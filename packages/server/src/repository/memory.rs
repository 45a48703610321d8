use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{PodcastRepository, RepositoryError};
use crate::models::{Episode, Podcast};

#[derive(Default)]
struct State {
    podcasts: HashMap<String, Podcast>,
    episodes: HashMap<String, Episode>,
}

/// Process-local repository. Used by tests and when no database is configured.
#[derive(Default)]
pub struct MemoryRepository {
    state: RwLock<State>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_episodes<'a>(episodes: impl Iterator<Item = &'a Episode>) -> Vec<Episode> {
    let mut list: Vec<Episode> = episodes.cloned().collect();
    list.sort_by(|a, b| {
        a.publish_date
            .cmp(&b.publish_date)
            .then_with(|| a.id.cmp(&b.id))
    });
    list
}

#[async_trait]
impl PodcastRepository for MemoryRepository {
    async fn list_podcasts(&self, owner_id: &str) -> Result<Vec<Podcast>, RepositoryError> {
        let state = self.state.read().await;
        let mut list: Vec<Podcast> = state
            .podcasts
            .values()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(list)
    }

    async fn find_podcast(&self, podcast_id: &str) -> Result<Option<Podcast>, RepositoryError> {
        Ok(self.state.read().await.podcasts.get(podcast_id).cloned())
    }

    async fn insert_podcast(&self, podcast: &Podcast) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        if state.podcasts.contains_key(&podcast.id) {
            return Err(RepositoryError::Corrupt(format!(
                "duplicate podcast id {}",
                podcast.id
            )));
        }
        state.podcasts.insert(podcast.id.clone(), podcast.clone());
        Ok(())
    }

    async fn update_podcast(&self, podcast: &Podcast) -> Result<bool, RepositoryError> {
        let mut state = self.state.write().await;
        match state.podcasts.get_mut(&podcast.id) {
            Some(slot) => {
                *slot = podcast.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_podcast(&self, podcast_id: &str) -> Result<Vec<Episode>, RepositoryError> {
        let mut state = self.state.write().await;
        let removed = sorted_episodes(
            state
                .episodes
                .values()
                .filter(|e| e.podcast_id == podcast_id),
        );
        state.episodes.retain(|_, e| e.podcast_id != podcast_id);
        state.podcasts.remove(podcast_id);
        Ok(removed)
    }

    async fn list_episodes(&self, podcast_id: &str) -> Result<Vec<Episode>, RepositoryError> {
        let state = self.state.read().await;
        Ok(sorted_episodes(
            state
                .episodes
                .values()
                .filter(|e| e.podcast_id == podcast_id),
        ))
    }

    async fn find_episode(
        &self,
        podcast_id: &str,
        episode_id: &str,
    ) -> Result<Option<Episode>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .episodes
            .get(episode_id)
            .filter(|e| e.podcast_id == podcast_id)
            .cloned())
    }

    async fn insert_episode(&self, episode: &Episode) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        if !state.podcasts.contains_key(&episode.podcast_id) {
            return Err(RepositoryError::Corrupt(format!(
                "episode {} references missing podcast {}",
                episode.id, episode.podcast_id
            )));
        }
        if state.episodes.contains_key(&episode.id) {
            return Err(RepositoryError::Corrupt(format!(
                "duplicate episode id {}",
                episode.id
            )));
        }
        state.episodes.insert(episode.id.clone(), episode.clone());
        Ok(())
    }

    async fn update_episode(&self, episode: &Episode) -> Result<Option<Episode>, RepositoryError> {
        let mut state = self.state.write().await;
        match state.episodes.get_mut(&episode.id) {
            Some(slot) if slot.podcast_id == episode.podcast_id => {
                *slot = Episode {
                    download_count: slot.download_count,
                    ..episode.clone()
                };
                Ok(Some(slot.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_episode(
        &self,
        podcast_id: &str,
        episode_id: &str,
    ) -> Result<bool, RepositoryError> {
        let mut state = self.state.write().await;
        let owned = state
            .episodes
            .get(episode_id)
            .is_some_and(|e| e.podcast_id == podcast_id);
        if owned {
            state.episodes.remove(episode_id);
        }
        Ok(owned)
    }

    async fn increment_downloads(
        &self,
        podcast_id: &str,
        episode_id: &str,
    ) -> Result<Option<Episode>, RepositoryError> {
        let mut state = self.state.write().await;
        match state.episodes.get_mut(episode_id) {
            Some(episode) if episode.podcast_id == podcast_id => {
                episode.download_count = episode.download_count.saturating_add(1);
                Ok(Some(episode.clone()))
            }
            _ => Ok(None),
        }
    }
}
