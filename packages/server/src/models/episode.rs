use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::shared::timespan;

/// MIME type assumed when none is declared.
pub const DEFAULT_MIME_TYPE: &str = "audio/mpeg";

/// A single audio installment of a podcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Episode {
    pub id: String,
    /// Parent show. Set by the server.
    pub podcast_id: String,
    pub title: String,
    pub description: String,
    /// Locator of the stored audio.
    pub audio_url: String,
    /// Original upload filename.
    pub audio_file_name: String,
    #[serde(with = "timespan")]
    #[schema(value_type = String, example = "00:42:17")]
    pub duration: Duration,
    /// Stored audio size in bytes.
    pub file_size: u64,
    #[schema(example = "audio/mpeg")]
    pub mime_type: String,
    pub season: Option<u32>,
    #[serde(rename = "episode")]
    pub episode_number: Option<u32>,
    pub publish_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub explicit: bool,
    pub image_url: String,
    pub download_count: u64,
    /// Content store key of the audio object. Never exposed.
    #[serde(skip)]
    pub audio_object: String,
}

impl Default for Episode {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            podcast_id: String::new(),
            title: String::new(),
            description: String::new(),
            audio_url: String::new(),
            audio_file_name: String::new(),
            duration: Duration::ZERO,
            file_size: 0,
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            season: None,
            episode_number: None,
            publish_date: now,
            created_at: now,
            updated_at: now,
            explicit: false,
            image_url: String::new(),
            download_count: 0,
            audio_object: String::new(),
        }
    }
}

impl Episode {
    /// Copy the client-editable metadata of `input` onto `self`.
    ///
    /// Audio fields, the download counter, identity and timestamps other than
    /// `publish_date` are left alone.
    pub fn merge_metadata(&mut self, input: Episode) {
        self.title = input.title.trim().to_string();
        self.description = input.description;
        self.duration = input.duration;
        self.season = input.season;
        self.episode_number = input.episode_number;
        self.publish_date = input.publish_date;
        self.explicit = input.explicit;
        self.image_url = input.image_url;
    }
}
