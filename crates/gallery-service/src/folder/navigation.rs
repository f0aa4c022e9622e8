//! Breadcrumb navigation through the folder tree.

use serde::Serialize;

use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_entity::folder::path::{folder_id_for_path, rebase_path};
use gallery_entity::{Category, FolderTree, NodeIndex, ParentRef};

/// The open category and the folder ids from its root down to the current folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    category: Option<Category>,
    folder_ids: Vec<String>,
}

/// One step of a resolved breadcrumb, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreadcrumbStep {
    /// Folder or category id.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl Breadcrumb {
    /// Open category, if any.
    pub fn category(&self) -> Option<Category> {
        self.category
    }

    /// Folder ids from the category root down.
    pub fn folder_ids(&self) -> &[String] {
        &self.folder_ids
    }

    /// Number of folders below the category root.
    pub fn depth(&self) -> usize {
        self.folder_ids.len()
    }

    /// Id of the folder currently open, if below a category root.
    pub fn current_folder_id(&self) -> Option<&str> {
        self.folder_ids.last().map(String::as_str)
    }

    /// Open a category at its root.
    pub fn open_category(&mut self, category: Category) {
        self.category = Some(category);
        self.folder_ids.clear();
    }

    /// Close everything.
    pub fn reset(&mut self) {
        self.category = None;
        self.folder_ids.clear();
    }

    /// Descend into `folder_id`, which must be a direct child of the current position.
    pub fn open_folder(&mut self, tree: &FolderTree, folder_id: &str) -> AppResult<()> {
        let position = self
            .position(tree)
            .ok_or_else(|| AppError::validation("Open a category before opening a folder"))?;
        let target = tree
            .index_of(folder_id)
            .ok_or_else(|| AppError::not_found(format!("Folder '{folder_id}' not found")))?;

        if tree.parent_of(target) != position {
            return Err(AppError::validation(format!(
                "Folder '{folder_id}' is not inside the current folder"
            )));
        }
        self.folder_ids.push(folder_id.to_string());
        Ok(())
    }

    /// Step up one level. At a category root this closes the category.
    pub fn go_up(&mut self) {
        if self.folder_ids.pop().is_none() {
            self.category = None;
        }
    }

    /// Keep only the first `depth` folders. Zero returns to the category root.
    pub fn go_to(&mut self, depth: usize) {
        self.folder_ids.truncate(depth);
    }

    /// Where the breadcrumb points in `tree`, or `None` when no category is open
    /// or the trail no longer resolves.
    pub fn position(&self, tree: &FolderTree) -> Option<ParentRef> {
        let category = self.category?;
        tree.category(category)?;

        let mut position = ParentRef::Category(category);
        for id in &self.folder_ids {
            let idx = tree.index_of(id)?;
            if tree.parent_of(idx) != position {
                return None;
            }
            position = ParentRef::Folder(idx);
        }
        Some(position)
    }

    /// Re-point entries at or below a renamed folder to their new ids.
    ///
    /// `tree` is the tree as it was before the rename.
    pub fn remap_renamed(&mut self, tree: &FolderTree, old_path: &str, new_path: &str) {
        for id in &mut self.folder_ids {
            let Some(node) = tree.find_by_id(id) else {
                continue;
            };
            if let Some(rebased) = rebase_path(&node.relative_path, old_path, new_path) {
                *id = folder_id_for_path(&rebased);
            }
        }
    }

    /// Drop the part of the trail that no longer resolves in `tree`.
    pub fn retain_resolvable(&mut self, tree: &FolderTree) {
        let Some(category) = self.category else {
            return;
        };
        if tree.category(category).is_none() {
            self.reset();
            return;
        }

        let mut position = ParentRef::Category(category);
        let mut keep = 0;
        for id in &self.folder_ids {
            match tree.index_of(id) {
                Some(idx) if tree.parent_of(idx) == position => {
                    position = ParentRef::Folder(idx);
                    keep += 1;
                }
                _ => break,
            }
        }
        self.folder_ids.truncate(keep);
    }

    /// Category root followed by each open folder.
    pub fn steps(&self, tree: &FolderTree) -> Vec<BreadcrumbStep> {
        let Some(category) = self.category else {
            return Vec::new();
        };
        let mut steps = vec![BreadcrumbStep {
            id: category.slug().to_string(),
            name: category.display_name().to_string(),
        }];
        steps.extend(self.folder_ids.iter().map(|id| BreadcrumbStep {
            id: id.clone(),
            name: tree
                .find_by_id(id)
                .map(|n| n.name.clone())
                .unwrap_or_else(|| id.clone()),
        }));
        steps
    }

    /// Index of the open folder in `tree`.
    pub fn current_index(&self, tree: &FolderTree) -> Option<NodeIndex> {
        match self.position(tree)? {
            ParentRef::Folder(idx) => Some(idx),
            ParentRef::Category(_) => None,
        }
    }
}
