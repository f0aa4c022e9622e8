//! # gallery-service
//!
//! The folder tree manager for the clinic media gallery. It rebuilds the
//! local tree from the server listing, validates folder mutations before
//! sending them, reloads after every successful one, and offers local file
//! organisation, breadcrumb navigation and file queries on top.
//!
//! The manager is constructed with an `Arc<dyn FolderApi>`, so the same code
//! runs against the HTTP server or the in-memory provider.

pub mod file;
pub mod folder;

pub use file::GalleryQuery;
pub use folder::{
    Breadcrumb, BreadcrumbStep, FolderTreeManager, GalleryState, LeafAssignment, LoadOutcome,
    RenameOutcome,
};
