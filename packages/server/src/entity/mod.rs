pub mod episode;
pub mod podcast;
