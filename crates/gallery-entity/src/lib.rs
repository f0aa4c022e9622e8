//! # gallery-entity
//!
//! Domain entity models for the clinic media gallery: the fixed top-level
//! categories, media files, and the arena-backed folder tree with its
//! path and slug helpers.

pub mod category;
pub mod file;
pub mod folder;

pub use category::Category;
pub use file::{FileId, MediaFile, MediaType};
pub use folder::{FolderNode, FolderTree, NodeIndex, ParentRef};
