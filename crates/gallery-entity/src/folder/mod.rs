//! Folder domain entities.

pub mod model;
pub mod path;
pub mod tree;

pub use model::{
    CategoryRoot, CategorySummary, FileLocation, FolderNode, FolderSummary, NodeIndex, ParentRef,
};
pub use tree::FolderTree;
