use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-episode line in a stats snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeStat {
    pub episode_id: String,
    pub title: String,
    pub downloads: u64,
    pub publish_date: DateTime<Utc>,
}

/// Computed-on-demand statistics for one podcast. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PodcastStats {
    pub podcast_id: String,
    pub total_downloads: u64,
    pub total_episodes: u64,
    /// Sum of episode file sizes in bytes.
    #[serde(rename = "totalStorage")]
    pub total_storage_bytes: u64,
    #[schema(example = "1.5 KB")]
    pub total_storage_formatted: String,
    pub episode_stats: Vec<EpisodeStat>,
    /// Downloads keyed by `YYYY-MM` of the episode's publish date.
    #[schema(example = json!({"2024-03": 5}))]
    pub downloads_by_month: BTreeMap<String, u64>,
    pub last_updated: DateTime<Utc>,
}
