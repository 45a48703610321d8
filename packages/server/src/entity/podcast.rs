use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "podcast")]
pub struct Model {
    /// UUIDv4 in canonical string form.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub author: String,
    pub email: String,
    pub image_url: String,

    /// Ordered category tags as a JSON array of strings.
    #[sea_orm(column_type = "JsonBinary")]
    pub categories: Json,

    pub website_url: String,
    pub language: String,
    pub explicit: bool,

    #[sea_orm(indexed)]
    pub owner_id: String,

    pub rss_url: String,

    #[sea_orm(has_many)]
    pub episodes: HasMany<super::episode::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
