pub mod episode;
pub mod listen;
pub mod media;
pub mod podcast;
