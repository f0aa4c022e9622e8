//! Local file placement: move, remove, and bulk redistribution.
//!
//! These operate on the tree alone. The server has no endpoint for them, so
//! their effect lasts until the next reload.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_entity::{Category, FileId, FolderTree, NodeIndex, ParentRef};

/// Files assigned to one leaf by a redistribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeafAssignment {
    /// Category the leaf belongs to.
    pub category: Category,
    /// Leaf folder id.
    pub folder_id: String,
    /// Leaf relative path.
    pub path: String,
    /// Files placed in the leaf.
    pub file_ids: Vec<FileId>,
}

/// Take a file out of wherever it is and put it under the folder `target_id`.
///
/// A folder with children passes the file down to its first leaf in
/// pre-order. Returns the folder that received the file.
pub fn move_file_to_folder(
    tree: &mut FolderTree,
    file_id: FileId,
    target_id: &str,
) -> AppResult<NodeIndex> {
    let target = tree
        .index_of(target_id)
        .ok_or_else(|| AppError::not_found(format!("Target folder '{target_id}' not found")))?;
    let destination = tree.first_leaf(target);

    tree.remove_file_everywhere(file_id);
    tree.insert_file(destination, file_id);
    Ok(destination)
}

/// Split `len` items into `parts` runs whose sizes differ by at most one.
fn chunk_sizes(len: usize, parts: usize) -> Vec<usize> {
    if parts == 0 {
        return Vec::new();
    }
    let base = len / parts;
    let extra = len % parts;
    (0..parts).map(|i| base + usize::from(i < extra)).collect()
}

/// Wipe all placement and deal `file_ids` out again at random.
///
/// Duplicates are dropped. Files are shuffled, split evenly across the
/// tree's categories, then evenly across each category's leaves. A category
/// without folders gets a fresh leaf named `unsorted_name`.
pub fn distribute_randomly<R: Rng + ?Sized>(
    tree: &mut FolderTree,
    file_ids: &[FileId],
    unsorted_name: &str,
    rng: &mut R,
) -> Vec<LeafAssignment> {
    let mut ids: Vec<FileId> = Vec::with_capacity(file_ids.len());
    for &id in file_ids {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids.shuffle(rng);
    tree.clear_files();

    let categories: Vec<Category> = tree.categories().iter().map(|r| r.category).collect();
    let mut remaining = ids.as_slice();
    let mut assignments = Vec::new();

    for (category, count) in categories
        .iter()
        .copied()
        .zip(chunk_sizes(ids.len(), categories.len()))
    {
        let (share, rest) = remaining.split_at(count);
        remaining = rest;

        let mut leaves = tree.leaves(category);
        if leaves.is_empty() {
            leaves.push(tree.add_folder(ParentRef::Category(category), unsorted_name, Vec::new()));
        }

        let mut pending = share;
        for (leaf, take) in leaves.iter().copied().zip(chunk_sizes(share.len(), leaves.len())) {
            let (batch, rest) = pending.split_at(take);
            pending = rest;
            for &id in batch {
                tree.insert_file(leaf, id);
            }

            let node = tree.node(leaf);
            assignments.push(LeafAssignment {
                category,
                folder_id: node.id.clone(),
                path: node.relative_path.clone(),
                file_ids: batch.to_vec(),
            });
        }
    }

    assignments
}
