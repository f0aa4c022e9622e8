//! Arena-backed folder tree.
//!
//! Folders live in a flat `Vec` and refer to each other by [`NodeIndex`],
//! so there is no recursive ownership. Category roots own ordered lists of
//! top-level folder indices. The tree is append-only: removing folders is
//! the server's job and is observed through a rebuild.

use std::collections::HashMap;

use crate::category::Category;
use crate::file::FileId;

use super::model::{
    CategoryRoot, CategorySummary, FileLocation, FolderNode, FolderSummary, NodeIndex, ParentRef,
};
use super::path::{
    folder_id_for_path, join_path, names_collide, normalize_path, rebase_path, split_path,
};

/// A forest of folders grouped under fixed category roots.
#[derive(Debug, Clone, Default)]
pub struct FolderTree {
    /// Every folder, in insertion order.
    nodes: Vec<FolderNode>,
    /// Category roots, kept in canonical category order.
    roots: Vec<CategoryRoot>,
    /// First folder (in document order) for each id.
    by_id: HashMap<String, NodeIndex>,
}

impl FolderTree {
    /// Create a tree with no categories.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a tree holding the given categories, all without folders.
    pub fn with_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut tree = Self::empty();
        for category in categories {
            tree.add_category(category);
        }
        tree
    }

    /// Create a tree holding every category.
    pub fn with_all_categories() -> Self {
        Self::with_categories(Category::ALL)
    }

    /// Number of folders (category roots excluded).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no folders.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Category roots in canonical order.
    pub fn categories(&self) -> &[CategoryRoot] {
        &self.roots
    }

    /// Look up a category root.
    pub fn category(&self, category: Category) -> Option<&CategoryRoot> {
        self.roots.iter().find(|r| r.category == category)
    }

    fn category_mut(&mut self, category: Category) -> Option<&mut CategoryRoot> {
        self.roots.iter_mut().find(|r| r.category == category)
    }

    /// Ensure a category root exists and return it.
    pub fn add_category(&mut self, category: Category) -> &mut CategoryRoot {
        let pos = match self.roots.binary_search_by(|r| r.category.cmp(&category)) {
            Ok(pos) => pos,
            Err(pos) => {
                self.roots.insert(pos, CategoryRoot::new(category));
                pos
            }
        };
        &mut self.roots[pos]
    }

    /// Borrow a folder.
    ///
    /// Panics if `idx` was issued by a different tree.
    pub fn node(&self, idx: NodeIndex) -> &FolderNode {
        &self.nodes[idx.0]
    }

    /// Iterate over every folder with its index, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &FolderNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeIndex(i), n))
    }

    /// Append a folder under `parent`. Its path and id are derived from the parent.
    ///
    /// A missing category root is created. Duplicate names are not checked
    /// here; callers validate before asking the server.
    pub fn add_folder(
        &mut self,
        parent: ParentRef,
        name: &str,
        file_ids: Vec<FileId>,
    ) -> NodeIndex {
        let category = self.category_of(parent);
        let relative_path = join_path(&self.parent_path(parent), name);
        let id = folder_id_for_path(&relative_path);
        let idx = NodeIndex(self.nodes.len());

        self.nodes.push(FolderNode {
            id: id.clone(),
            name: name.trim().to_string(),
            relative_path,
            file_ids,
            category,
            parent: match parent {
                ParentRef::Folder(p) => Some(p),
                ParentRef::Category(_) => None,
            },
            children: Vec::new(),
        });
        self.by_id.entry(id).or_insert(idx);

        match parent {
            ParentRef::Category(c) => self.add_category(c).children.push(idx),
            ParentRef::Folder(p) => self.nodes[p.0].children.push(idx),
        }

        idx
    }

    /// Category a parent reference belongs to.
    pub fn category_of(&self, parent: ParentRef) -> Category {
        match parent {
            ParentRef::Category(c) => c,
            ParentRef::Folder(p) => self.nodes[p.0].category,
        }
    }

    /// Relative path of a parent reference.
    pub fn parent_path(&self, parent: ParentRef) -> String {
        match parent {
            ParentRef::Category(c) => c.display_name().to_string(),
            ParentRef::Folder(p) => self.nodes[p.0].relative_path.clone(),
        }
    }

    /// Child folders of a parent reference.
    pub fn children(&self, parent: ParentRef) -> &[NodeIndex] {
        match parent {
            ParentRef::Category(c) => self
                .category(c)
                .map(|r| r.children.as_slice())
                .unwrap_or(&[]),
            ParentRef::Folder(p) => &self.nodes[p.0].children,
        }
    }

    /// Where a folder hangs.
    pub fn parent_of(&self, idx: NodeIndex) -> ParentRef {
        let node = &self.nodes[idx.0];
        match node.parent {
            Some(p) => ParentRef::Folder(p),
            None => ParentRef::Category(node.category),
        }
    }

    /// Find the first folder with this id in document order.
    pub fn find_by_id(&self, id: &str) -> Option<&FolderNode> {
        self.index_of(id).map(|idx| &self.nodes[idx.0])
    }

    /// Index of the first folder with this id in document order.
    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.by_id.get(id).copied()
    }

    /// Find a folder by relative path (separator-insensitive, case-sensitive).
    pub fn find_by_path(&self, path: &str) -> Option<NodeIndex> {
        let wanted = normalize_path(path);
        self.preorder()
            .into_iter()
            .find(|idx| self.nodes[idx.0].relative_path == wanted)
    }

    /// Resolve a path naming either a category root or a folder.
    pub fn resolve_parent(&self, path: &str) -> Option<ParentRef> {
        let segments = split_path(path);
        if segments.len() == 1 {
            if let Some(category) = Category::from_name(segments[0]) {
                if self.category(category).is_some() {
                    return Some(ParentRef::Category(category));
                }
            }
        }
        self.find_by_path(path).map(ParentRef::Folder)
    }

    /// Whether the folder has no child folders.
    pub fn is_leaf(&self, idx: NodeIndex) -> bool {
        self.nodes[idx.0].is_leaf()
    }

    /// `idx` followed by all its descendants, depth-first pre-order.
    pub fn preorder_from(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut order = Vec::new();
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            order.push(current);
            stack.extend(self.nodes[current.0].children.iter().rev().copied());
        }
        order
    }

    /// Every folder of one category, depth-first pre-order.
    pub fn category_folders(&self, category: Category) -> Vec<NodeIndex> {
        self.children(ParentRef::Category(category))
            .iter()
            .flat_map(|&child| self.preorder_from(child))
            .collect()
    }

    /// Every folder in the forest, category by category, depth-first pre-order.
    pub fn preorder(&self) -> Vec<NodeIndex> {
        self.roots
            .iter()
            .flat_map(|root| self.category_folders(root.category))
            .collect()
    }

    /// A folder's own files followed by its descendants' files, pre-order.
    ///
    /// Ids are not deduplicated across subtrees.
    pub fn all_file_ids(&self, idx: NodeIndex) -> Vec<FileId> {
        self.preorder_from(idx)
            .into_iter()
            .flat_map(|i| self.nodes[i.0].file_ids.iter().copied())
            .collect()
    }

    /// Root-level files of a category followed by every folder's files, pre-order.
    pub fn category_file_ids(&self, category: Category) -> Vec<FileId> {
        let Some(root) = self.category(category) else {
            return Vec::new();
        };
        let mut ids = root.root_file_ids.clone();
        for idx in self.category_folders(category) {
            ids.extend(self.nodes[idx.0].file_ids.iter().copied());
        }
        ids
    }

    /// The folder itself if it is a leaf, else its first leaf descendant in pre-order.
    pub fn first_leaf(&self, idx: NodeIndex) -> NodeIndex {
        self.preorder_from(idx)
            .into_iter()
            .find(|&i| self.is_leaf(i))
            .unwrap_or(idx)
    }

    /// Leaf folders of a category, pre-order.
    pub fn leaves(&self, category: Category) -> Vec<NodeIndex> {
        self.category_folders(category)
            .into_iter()
            .filter(|&i| self.is_leaf(i))
            .collect()
    }

    /// Folders from the category root down to `idx`, inclusive.
    pub fn ancestry(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut chain = vec![idx];
        let mut current = self.nodes[idx.0].parent;
        while let Some(p) = current {
            chain.push(p);
            current = self.nodes[p.0].parent;
        }
        chain.reverse();
        chain
    }

    /// Whether a sibling under `parent` already uses `name`, ignoring case.
    pub fn sibling_name_taken(
        &self,
        parent: ParentRef,
        name: &str,
        exclude: Option<NodeIndex>,
    ) -> bool {
        self.children(parent)
            .iter()
            .filter(|&&i| Some(i) != exclude)
            .any(|&i| names_collide(&self.nodes[i.0].name, name))
    }

    /// Whether placing a folder at `new_path` would reuse an id held elsewhere.
    ///
    /// With `moved` set, the folder and its descendants are rebased onto
    /// `new_path` and only clashes with folders outside that subtree count.
    pub fn path_id_taken(&self, new_path: &str, moved: Option<NodeIndex>) -> bool {
        let Some(root) = moved else {
            return self.index_of(&folder_id_for_path(new_path)).is_some();
        };

        let subtree = self.preorder_from(root);
        let old_prefix = &self.nodes[root.0].relative_path;
        subtree.iter().any(|&i| {
            rebase_path(&self.nodes[i.0].relative_path, old_prefix, new_path)
                .and_then(|path| self.index_of(&folder_id_for_path(&path)))
                .is_some_and(|other| !subtree.contains(&other))
        })
    }

    /// First place a file appears, category roots before their folders.
    pub fn locate_file(&self, file_id: FileId) -> Option<FileLocation> {
        for root in &self.roots {
            if root.root_file_ids.contains(&file_id) {
                return Some(FileLocation::CategoryRoot(root.category));
            }
            if let Some(idx) = self
                .category_folders(root.category)
                .into_iter()
                .find(|i| self.nodes[i.0].file_ids.contains(&file_id))
            {
                return Some(FileLocation::Folder(idx));
            }
        }
        None
    }

    /// Remove a file id from every folder and category root. Returns how many entries went.
    pub fn remove_file_everywhere(&mut self, file_id: FileId) -> usize {
        let mut removed = 0;
        for root in &mut self.roots {
            let before = root.root_file_ids.len();
            root.root_file_ids.retain(|&id| id != file_id);
            removed += before - root.root_file_ids.len();
        }
        for node in &mut self.nodes {
            let before = node.file_ids.len();
            node.file_ids.retain(|&id| id != file_id);
            removed += before - node.file_ids.len();
        }
        removed
    }

    /// Append a file to a folder unless it is already there. Returns whether it was added.
    pub fn insert_file(&mut self, idx: NodeIndex, file_id: FileId) -> bool {
        let ids = &mut self.nodes[idx.0].file_ids;
        if ids.contains(&file_id) {
            return false;
        }
        ids.push(file_id);
        true
    }

    /// Replace the root-level file list of a category, creating the root if needed.
    pub fn set_root_file_ids(&mut self, category: Category, file_ids: Vec<FileId>) {
        self.add_category(category).root_file_ids = file_ids;
    }

    /// Empty every folder and category root of files.
    pub fn clear_files(&mut self) {
        for root in &mut self.roots {
            root.root_file_ids.clear();
        }
        for node in &mut self.nodes {
            node.file_ids.clear();
        }
    }

    /// Append files to a category root's list.
    pub fn extend_root_files(&mut self, category: Category, file_ids: &[FileId]) {
        if let Some(root) = self.category_mut(category) {
            root.root_file_ids.extend_from_slice(file_ids);
        }
    }

    /// Nested display view of the whole forest.
    pub fn summary(&self) -> Vec<CategorySummary> {
        self.roots
            .iter()
            .map(|root| CategorySummary {
                category: root.category,
                name: root.category.display_name().to_string(),
                file_count: self.category_file_ids(root.category).len() as u64,
                folders: root.children.iter().map(|&i| self.summarize(i)).collect(),
            })
            .collect()
    }

    fn summarize(&self, idx: NodeIndex) -> FolderSummary {
        let node = &self.nodes[idx.0];
        FolderSummary {
            id: node.id.clone(),
            name: node.name.clone(),
            path: node.relative_path.clone(),
            depth: node.depth(),
            child_count: node.children.len() as u64,
            file_count: self.all_file_ids(idx).len() as u64,
            children: node.children.iter().map(|&c| self.summarize(c)).collect(),
        }
    }
}
