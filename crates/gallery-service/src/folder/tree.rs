//! Build the local folder tree from a server listing.

use tracing::warn;

use gallery_client::dto::{FolderListing, RemoteFolderNode};
use gallery_entity::folder::path::split_path;
use gallery_entity::{Category, FolderTree, ParentRef};

/// Rebuild the whole tree from a listing.
///
/// Top-level nodes are category roots, matched by name or path. Folder paths
/// and ids are re-derived from names, so server-assigned ids are ignored.
/// An empty listing yields every category with no folders.
pub fn build_tree(listing: &FolderListing) -> FolderTree {
    if listing.folders.is_empty() {
        return FolderTree::with_all_categories();
    }

    let mut tree = FolderTree::empty();
    for root in &listing.folders {
        let Some(category) = category_for(root) else {
            warn!(name = %root.name, path = %root.path, "Skipping unknown top-level folder");
            continue;
        };

        tree.add_category(category);
        tree.extend_root_files(category, &root.file_ids);
        for child in &root.children {
            add_subtree(&mut tree, ParentRef::Category(category), child);
        }
    }
    tree
}

fn category_for(node: &RemoteFolderNode) -> Option<Category> {
    Category::from_name(&node.name).or_else(|| {
        split_path(&node.path)
            .first()
            .and_then(|segment| Category::from_name(segment))
    })
}

fn add_subtree(tree: &mut FolderTree, parent: ParentRef, node: &RemoteFolderNode) {
    let name = node.name.trim();
    if name.is_empty() {
        warn!(path = %node.path, "Skipping folder without a name");
        return;
    }

    let idx = tree.add_folder(parent, name, node.file_ids.clone());
    for child in &node.children {
        add_subtree(tree, ParentRef::Folder(idx), child);
    }
}
