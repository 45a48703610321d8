use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "episode")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub podcast_id: String,
    #[sea_orm(belongs_to, from = "podcast_id", to = "id")]
    pub podcast: HasOne<super::podcast::Entity>,

    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub audio_url: String,
    pub audio_file_name: String,
    /// Content store key within the audio container.
    pub audio_object: String,

    pub duration_ms: i64,
    pub file_size: i64,
    pub mime_type: String,

    pub season: Option<i32>,
    pub episode_number: Option<i32>,

    #[sea_orm(indexed)]
    pub publish_date: DateTimeUtc,

    pub explicit: bool,
    pub image_url: String,

    #[sea_orm(default_value = 0)]
    pub download_count: i64,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
