use std::time::Duration;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::{PodcastRepository, RepositoryError};
use crate::entity::{episode, podcast};
use crate::models::{Episode, Podcast};

/// Relational repository backed by sea-orm.
#[derive(Clone)]
pub struct SqlRepository {
    db: DatabaseConnection,
}

impl SqlRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn to_u64(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

fn to_i32(value: Option<u32>) -> Option<i32> {
    value.map(|v| i32::try_from(v).unwrap_or(i32::MAX))
}

fn to_u32(value: Option<i32>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v).ok())
}

fn podcast_from_model(model: podcast::Model) -> Result<Podcast, RepositoryError> {
    let categories: Vec<String> = serde_json::from_value(model.categories).map_err(|e| {
        RepositoryError::Corrupt(format!("podcast {} categories: {e}", model.id))
    })?;

    Ok(Podcast {
        id: model.id,
        title: model.title,
        description: model.description,
        author: model.author,
        email: model.email,
        image_url: model.image_url,
        categories,
        website_url: model.website_url,
        language: model.language,
        explicit: model.explicit,
        owner_id: model.owner_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
        rss_url: model.rss_url,
    })
}

fn podcast_active_model(podcast: &Podcast) -> Result<podcast::ActiveModel, RepositoryError> {
    let categories = serde_json::to_value(&podcast.categories)
        .map_err(|e| RepositoryError::Corrupt(format!("podcast {} categories: {e}", podcast.id)))?;

    Ok(podcast::ActiveModel {
        id: Set(podcast.id.clone()),
        title: Set(podcast.title.clone()),
        description: Set(podcast.description.clone()),
        author: Set(podcast.author.clone()),
        email: Set(podcast.email.clone()),
        image_url: Set(podcast.image_url.clone()),
        categories: Set(categories),
        website_url: Set(podcast.website_url.clone()),
        language: Set(podcast.language.clone()),
        explicit: Set(podcast.explicit),
        owner_id: Set(podcast.owner_id.clone()),
        rss_url: Set(podcast.rss_url.clone()),
        created_at: Set(podcast.created_at),
        updated_at: Set(podcast.updated_at),
    })
}

fn episode_from_model(model: episode::Model) -> Episode {
    Episode {
        id: model.id,
        podcast_id: model.podcast_id,
        title: model.title,
        description: model.description,
        audio_url: model.audio_url,
        audio_file_name: model.audio_file_name,
        duration: Duration::from_millis(to_u64(model.duration_ms)),
        file_size: to_u64(model.file_size),
        mime_type: model.mime_type,
        season: to_u32(model.season),
        episode_number: to_u32(model.episode_number),
        publish_date: model.publish_date,
        created_at: model.created_at,
        updated_at: model.updated_at,
        explicit: model.explicit,
        image_url: model.image_url,
        download_count: to_u64(model.download_count),
        audio_object: model.audio_object,
    }
}

/// Durations are kept at millisecond precision.
fn episode_active_model(episode: &Episode) -> episode::ActiveModel {
    episode::ActiveModel {
        id: Set(episode.id.clone()),
        podcast_id: Set(episode.podcast_id.clone()),
        title: Set(episode.title.clone()),
        description: Set(episode.description.clone()),
        audio_url: Set(episode.audio_url.clone()),
        audio_file_name: Set(episode.audio_file_name.clone()),
        audio_object: Set(episode.audio_object.clone()),
        duration_ms: Set(i64::try_from(episode.duration.as_millis()).unwrap_or(i64::MAX)),
        file_size: Set(to_i64(episode.file_size)),
        mime_type: Set(episode.mime_type.clone()),
        season: Set(to_i32(episode.season)),
        episode_number: Set(to_i32(episode.episode_number)),
        publish_date: Set(episode.publish_date),
        explicit: Set(episode.explicit),
        image_url: Set(episode.image_url.clone()),
        download_count: Set(to_i64(episode.download_count)),
        created_at: Set(episode.created_at),
        updated_at: Set(episode.updated_at),
    }
}

/// Update columns for an existing episode. The counter only moves through
/// `increment_downloads`.
fn episode_update_model(episode: &Episode) -> episode::ActiveModel {
    episode::ActiveModel {
        download_count: NotSet,
        ..episode_active_model(episode)
    }
}

#[async_trait]
impl PodcastRepository for SqlRepository {
    async fn list_podcasts(&self, owner_id: &str) -> Result<Vec<Podcast>, RepositoryError> {
        podcast::Entity::find()
            .filter(podcast::Column::OwnerId.eq(owner_id))
            .order_by_asc(podcast::Column::CreatedAt)
            .order_by_asc(podcast::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(podcast_from_model)
            .collect()
    }

    async fn find_podcast(&self, podcast_id: &str) -> Result<Option<Podcast>, RepositoryError> {
        podcast::Entity::find_by_id(podcast_id.to_string())
            .one(&self.db)
            .await?
            .map(podcast_from_model)
            .transpose()
    }

    async fn insert_podcast(&self, podcast: &Podcast) -> Result<(), RepositoryError> {
        podcast::Entity::insert(podcast_active_model(podcast)?)
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    async fn update_podcast(&self, podcast: &Podcast) -> Result<bool, RepositoryError> {
        let result = podcast::Entity::update_many()
            .set(podcast_active_model(podcast)?)
            .filter(podcast::Column::Id.eq(podcast.id.as_str()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_podcast(&self, podcast_id: &str) -> Result<Vec<Episode>, RepositoryError> {
        let txn = self.db.begin().await?;

        let removed = episode::Entity::find()
            .filter(episode::Column::PodcastId.eq(podcast_id))
            .order_by_asc(episode::Column::PublishDate)
            .order_by_asc(episode::Column::Id)
            .all(&txn)
            .await?;

        episode::Entity::delete_many()
            .filter(episode::Column::PodcastId.eq(podcast_id))
            .exec(&txn)
            .await?;
        podcast::Entity::delete_by_id(podcast_id.to_string())
            .exec(&txn)
            .await?;

        txn.commit().await?;

        Ok(removed.into_iter().map(episode_from_model).collect())
    }

    async fn list_episodes(&self, podcast_id: &str) -> Result<Vec<Episode>, RepositoryError> {
        let models = episode::Entity::find()
            .filter(episode::Column::PodcastId.eq(podcast_id))
            .order_by_asc(episode::Column::PublishDate)
            .order_by_asc(episode::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(episode_from_model).collect())
    }

    async fn find_episode(
        &self,
        podcast_id: &str,
        episode_id: &str,
    ) -> Result<Option<Episode>, RepositoryError> {
        let model = episode::Entity::find_by_id(episode_id.to_string())
            .filter(episode::Column::PodcastId.eq(podcast_id))
            .one(&self.db)
            .await?;
        Ok(model.map(episode_from_model))
    }

    async fn insert_episode(&self, episode: &Episode) -> Result<(), RepositoryError> {
        episode::Entity::insert(episode_active_model(episode))
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    async fn update_episode(&self, episode: &Episode) -> Result<Option<Episode>, RepositoryError> {
        let result = episode::Entity::update_many()
            .set(episode_update_model(episode))
            .filter(episode::Column::Id.eq(episode.id.as_str()))
            .filter(episode::Column::PodcastId.eq(episode.podcast_id.as_str()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find_episode(&episode.podcast_id, &episode.id).await
    }

    async fn delete_episode(
        &self,
        podcast_id: &str,
        episode_id: &str,
    ) -> Result<bool, RepositoryError> {
        let result = episode::Entity::delete_many()
            .filter(episode::Column::Id.eq(episode_id))
            .filter(episode::Column::PodcastId.eq(podcast_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn increment_downloads(
        &self,
        podcast_id: &str,
        episode_id: &str,
    ) -> Result<Option<Episode>, RepositoryError> {
        let result = episode::Entity::update_many()
            .col_expr(
                episode::Column::DownloadCount,
                Expr::col(episode::Column::DownloadCount).add(1),
            )
            .filter(episode::Column::Id.eq(episode_id))
            .filter(episode::Column::PodcastId.eq(podcast_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find_episode(podcast_id, episode_id).await
    }
}
