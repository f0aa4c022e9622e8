//! Folder entity model.

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::file::FileId;

/// Stable address of a folder inside one [`FolderTree`](super::FolderTree).
///
/// Indices are only meaningful for the tree that issued them; a reload
/// builds a new tree and new indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIndex(pub usize);

/// Where a folder hangs: directly under a category root or under another folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentRef {
    /// Top level of a category.
    Category(Category),
    /// Inside another folder.
    Folder(NodeIndex),
}

/// A folder in the gallery hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderNode {
    /// Id derived from `relative_path`.
    pub id: String,
    /// Display name, unique among siblings ignoring case.
    pub name: String,
    /// Names from the category root down to this folder, joined with `/`.
    pub relative_path: String,
    /// Files placed directly in this folder, in display order.
    pub file_ids: Vec<FileId>,
    /// The category this folder lives under.
    pub category: Category,
    /// Parent folder (None when directly under the category root).
    pub parent: Option<NodeIndex>,
    /// Child folders, in display order.
    pub children: Vec<NodeIndex>,
}

impl FolderNode {
    /// A leaf has no child folders; only leaves take uploads.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether the folder holds neither files nor subfolders.
    pub fn is_empty(&self) -> bool {
        self.file_ids.is_empty() && self.children.is_empty()
    }

    /// Depth below the category root (1 for a top-level folder).
    pub fn depth(&self) -> usize {
        super::path::split_path(&self.relative_path)
            .len()
            .saturating_sub(1)
    }
}

/// A fixed category root: its top-level folders plus files not yet sorted into one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRoot {
    /// Which category this is.
    pub category: Category,
    /// Files held at the category level itself.
    pub root_file_ids: Vec<FileId>,
    /// Top-level folders, in display order.
    pub children: Vec<NodeIndex>,
}

impl CategoryRoot {
    /// Create an empty category root.
    pub fn new(category: Category) -> Self {
        Self {
            category,
            root_file_ids: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// Where a file currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileLocation {
    /// In a category's root-level list.
    CategoryRoot(Category),
    /// In a folder.
    Folder(NodeIndex),
}

/// Nested, serializable view of a folder for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderSummary {
    /// Folder ID.
    pub id: String,
    /// Folder name.
    pub name: String,
    /// Relative path.
    pub path: String,
    /// Depth below the category root.
    pub depth: usize,
    /// Number of child folders.
    pub child_count: u64,
    /// Number of files in this folder and all folders below it.
    pub file_count: u64,
    /// Child folders.
    pub children: Vec<FolderSummary>,
}

/// Nested, serializable view of a category for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    /// The category.
    pub category: Category,
    /// Display name.
    pub name: String,
    /// Files at the category root plus everything below it.
    pub file_count: u64,
    /// Top-level folders.
    pub folders: Vec<FolderSummary>,
}
