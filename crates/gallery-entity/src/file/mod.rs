//! Media file domain entities.

pub mod model;

pub use model::{FileId, MediaFile, MediaType, format_human_size, parse_human_size};
