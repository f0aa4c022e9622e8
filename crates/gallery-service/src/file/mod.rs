//! Gallery file listing.

pub mod query;

pub use query::{GalleryQuery, visible_files};
