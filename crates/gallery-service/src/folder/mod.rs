//! Folder tree building, organisation, navigation, and the tree manager.

pub mod navigation;
pub mod organize;
pub mod service;
pub mod tree;

pub use navigation::{Breadcrumb, BreadcrumbStep};
pub use organize::LeafAssignment;
pub use service::{FolderTreeManager, GalleryState, LoadOutcome, RenameOutcome};
pub use tree::build_tree;
