use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::models::{Episode, EpisodeStat, PodcastStats};

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Human-readable byte formatting.
///
/// Picks the largest unit that keeps the value below 1024 (saturating at TB)
/// and prints at most two fractional digits with trailing zeros removed.
pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut order = 0;
    while value >= 1024.0 && order < UNITS.len() - 1 {
        value /= 1024.0;
        order += 1;
    }

    // 1048575 B is 1023.999 KB, which prints as "1024 KB". Promote instead.
    let mut rounded = (value * 100.0).round() / 100.0;
    if rounded >= 1024.0 && order < UNITS.len() - 1 {
        value /= 1024.0;
        order += 1;
        rounded = (value * 100.0).round() / 100.0;
    }

    let text = format!("{rounded:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{text} {}", UNITS[order])
}

/// `YYYY-MM` bucket key for a timestamp.
pub fn month_key(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m").to_string()
}

/// Build a stats snapshot from a podcast's full episode set.
///
/// Each episode contributes its current download count to the month it was
/// published in. `episode_stats` keeps the order of `episodes`.
pub fn aggregate(podcast_id: &str, episodes: &[Episode], now: DateTime<Utc>) -> PodcastStats {
    let mut total_downloads = 0u64;
    let mut total_storage_bytes = 0u64;
    let mut downloads_by_month: BTreeMap<String, u64> = BTreeMap::new();
    let mut episode_stats = Vec::with_capacity(episodes.len());

    for episode in episodes {
        total_downloads = total_downloads.saturating_add(episode.download_count);
        total_storage_bytes = total_storage_bytes.saturating_add(episode.file_size);

        let bucket = downloads_by_month
            .entry(month_key(&episode.publish_date))
            .or_insert(0);
        *bucket = bucket.saturating_add(episode.download_count);

        episode_stats.push(EpisodeStat {
            episode_id: episode.id.clone(),
            title: episode.title.clone(),
            downloads: episode.download_count,
            publish_date: episode.publish_date,
        });
    }

    PodcastStats {
        podcast_id: podcast_id.to_string(),
        total_downloads,
        total_episodes: episodes.len() as u64,
        total_storage_bytes,
        total_storage_formatted: format_bytes(total_storage_bytes),
        episode_stats,
        downloads_by_month,
        last_updated: now,
    }
}
