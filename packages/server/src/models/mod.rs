pub mod episode;
pub mod podcast;
pub mod shared;
pub mod stats;

pub use episode::Episode;
pub use podcast::Podcast;
pub use stats::{EpisodeStat, PodcastStats};
