//! Folder tree manager: keeps the local tree in step with the gallery server.

use std::sync::Arc;

use bytes::Bytes;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use gallery_client::dto::{
    CreateFolderRequest, DeleteFileRequest, DeleteFolderRequest, RenameFolderRequest,
};
use gallery_client::{FileUpload, FolderApi};
use gallery_core::config::gallery::GalleryConfig;
use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_entity::folder::path::{folder_id_for_path, join_path, normalize_path};
use gallery_entity::{Category, FileId, FolderNode, FolderTree, MediaFile, ParentRef};

use super::navigation::{Breadcrumb, BreadcrumbStep};
use super::organize::{self, LeafAssignment};
use super::tree::build_tree;
use crate::file::query::{GalleryQuery, visible_files};

/// Everything the manager knows locally.
#[derive(Debug, Clone, Default)]
pub struct GalleryState {
    /// Folder forest.
    pub tree: FolderTree,
    /// Flat file list from the last load.
    pub files: Vec<MediaFile>,
    /// Current navigation position.
    pub breadcrumb: Breadcrumb,
}

impl GalleryState {
    fn file(&self, file_id: FileId) -> Option<&MediaFile> {
        self.files.iter().find(|f| f.id == file_id)
    }
}

/// Result of a reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadOutcome {
    /// The listing was applied.
    Loaded {
        /// Folders in the new tree.
        folders: usize,
        /// Files in the new list.
        files: usize,
    },
    /// A newer load or an explicit cancel replaced this one; nothing was applied.
    Superseded,
}

/// Paths and ids before and after a rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameOutcome {
    /// Previous relative path.
    pub old_path: String,
    /// Previous id.
    pub old_id: String,
    /// New relative path.
    pub new_path: String,
    /// Id derived from the new path.
    pub new_id: String,
}

/// Maintains the folder tree and applies mutations through a [`FolderApi`].
///
/// Server mutations run one at a time: a call made while another is in
/// flight fails with a conflict and sends nothing. Every successful server
/// mutation is followed by a full reload.
#[derive(Debug)]
pub struct FolderTreeManager {
    /// Server backend.
    api: Arc<dyn FolderApi>,
    /// Gallery defaults.
    config: GalleryConfig,
    /// Local tree, files and breadcrumb.
    state: RwLock<GalleryState>,
    /// Held for the duration of a server mutation.
    mutation_gate: Mutex<()>,
    /// Token of the latest load.
    load_token: Mutex<CancellationToken>,
}

impl FolderTreeManager {
    /// Creates a manager with an empty tree. Call [`reload`](Self::reload) to populate it.
    pub fn new(api: Arc<dyn FolderApi>, config: GalleryConfig) -> Self {
        Self {
            api,
            config,
            state: RwLock::new(GalleryState::default()),
            mutation_gate: Mutex::new(()),
            load_token: Mutex::new(CancellationToken::new()),
        }
    }

    /// Backend in use.
    pub fn api(&self) -> &Arc<dyn FolderApi> {
        &self.api
    }

    /// Gallery defaults in use.
    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    // ── Loading ─────────────────────────────────────────────────────

    /// Fetch the listing and replace the tree and file list wholesale.
    ///
    /// Starting a load cancels any load still in flight.
    pub async fn reload(&self) -> AppResult<LoadOutcome> {
        let token = {
            let mut current = self.load_token.lock().await;
            current.cancel();
            *current = CancellationToken::new();
            current.clone()
        };

        let listing = tokio::select! {
            biased;
            _ = token.cancelled() => {
                warn!("Folder reload superseded");
                return Ok(LoadOutcome::Superseded);
            }
            listing = self.api.list() => listing?,
        };

        let tree = build_tree(&listing);
        let mut state = self.state.write().await;
        if token.is_cancelled() {
            warn!("Folder reload superseded");
            return Ok(LoadOutcome::Superseded);
        }

        let outcome = LoadOutcome::Loaded {
            folders: tree.len(),
            files: listing.files.len(),
        };
        state.tree = tree;
        state.files = listing.files;
        let GalleryState {
            tree, breadcrumb, ..
        } = &mut *state;
        breadcrumb.retain_resolvable(tree);

        debug!(?outcome, provider = self.api.provider_type(), "Folder tree reloaded");
        Ok(outcome)
    }

    /// Cancel the load in flight, if any.
    pub async fn cancel_load(&self) {
        self.load_token.lock().await.cancel();
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// Copy of the current state.
    pub async fn snapshot(&self) -> GalleryState {
        self.state.read().await.clone()
    }

    /// Run `f` against the current state without copying it.
    pub async fn inspect<R>(&self, f: impl FnOnce(&GalleryState) -> R) -> R {
        f(&*self.state.read().await)
    }

    /// First folder with `id` in document order.
    pub async fn find_by_id(&self, id: &str) -> Option<FolderNode> {
        self.state.read().await.tree.find_by_id(id).cloned()
    }

    /// A folder's files followed by all its descendants' files.
    pub async fn all_file_ids(&self, id: &str) -> AppResult<Vec<FileId>> {
        let state = self.state.read().await;
        let idx = state
            .tree
            .index_of(id)
            .ok_or_else(|| AppError::not_found(format!("Folder '{id}' not found")))?;
        Ok(state.tree.all_file_ids(idx))
    }

    /// Files visible at the breadcrumb position, filtered and sorted.
    pub async fn query_files(&self, query: &GalleryQuery) -> Vec<MediaFile> {
        let state = self.state.read().await;
        let position = state.breadcrumb.position(&state.tree);
        let visible = visible_files(&state.tree, &state.files, position);
        query.apply(visible).into_iter().cloned().collect()
    }

    // ── Server mutations ────────────────────────────────────────────

    fn begin_mutation(&self) -> AppResult<MutexGuard<'_, ()>> {
        self.mutation_gate.try_lock().map_err(|_| {
            AppError::conflict("Another change is still being saved. Try again when it finishes.")
        })
    }

    /// Create `name` under the category root or folder at `parent_path`.
    ///
    /// Returns the new folder's id.
    pub async fn create_subfolder(&self, parent_path: &str, name: &str) -> AppResult<String> {
        let _gate = self.begin_mutation()?;
        let name = validate_name(name)?;

        let request = {
            let state = self.state.read().await;
            let parent = state
                .tree
                .resolve_parent(parent_path)
                .ok_or_else(|| AppError::not_found(format!("Folder '{parent_path}' not found")))?;
            if state.tree.sibling_name_taken(parent, name, None) {
                return Err(AppError::validation("This sub folder name is already in use."));
            }
            let parent_path = state.tree.parent_path(parent);
            if state.tree.path_id_taken(&join_path(&parent_path, name), None) {
                return Err(id_taken(&join_path(&parent_path, name)));
            }
            CreateFolderRequest {
                parent_path,
                folder_name: name.to_string(),
            }
        };

        self.api.create_folder(&request).await?;

        let path = join_path(&request.parent_path, name);
        let folder_id = folder_id_for_path(&path);
        info!(path = %path, folder_id = %folder_id, "Folder created");

        self.reload().await?;
        Ok(folder_id)
    }

    /// Rename the folder at `path`.
    ///
    /// Breadcrumb entries at or below the folder are re-pointed to their new ids.
    pub async fn rename_folder(&self, path: &str, new_name: &str) -> AppResult<RenameOutcome> {
        let _gate = self.begin_mutation()?;
        let new_name = validate_name(new_name)?;

        let (request, parent_path, old_id) = {
            let state = self.state.read().await;
            let idx = state
                .tree
                .find_by_path(path)
                .ok_or_else(|| AppError::not_found(format!("Folder '{path}' not found")))?;
            let parent = state.tree.parent_of(idx);
            if state.tree.sibling_name_taken(parent, new_name, Some(idx)) {
                return Err(AppError::validation("This sub folder name is already in use."));
            }
            let target = join_path(&state.tree.parent_path(parent), new_name);
            if state.tree.path_id_taken(&target, Some(idx)) {
                return Err(id_taken(&target));
            }
            let node = state.tree.node(idx);
            (
                RenameFolderRequest {
                    current_path: node.relative_path.clone(),
                    new_name: new_name.to_string(),
                },
                state.tree.parent_path(parent),
                node.id.clone(),
            )
        };

        let response = self.api.rename_folder(&request).await?;
        let new_path = if response.path.trim().is_empty() {
            join_path(&parent_path, new_name)
        } else {
            normalize_path(&response.path)
        };

        let outcome = RenameOutcome {
            old_path: request.current_path,
            old_id,
            new_id: folder_id_for_path(&new_path),
            new_path,
        };

        let previous = {
            let mut state = self.state.write().await;
            let GalleryState {
                tree, breadcrumb, ..
            } = &mut *state;
            let previous = breadcrumb.clone();
            breadcrumb.remap_renamed(tree, &outcome.old_path, &outcome.new_path);
            previous
        };
        info!(
            old_path = %outcome.old_path,
            new_path = %outcome.new_path,
            folder_id = %outcome.new_id,
            "Folder renamed"
        );

        if let Err(err) = self.reload().await {
            // The old tree is still in place; point the breadcrumb back at it.
            self.state.write().await.breadcrumb = previous;
            return Err(err);
        }
        Ok(outcome)
    }

    /// Delete the folder at `path`. It must hold no files and no subfolders.
    pub async fn delete_folder(&self, path: &str) -> AppResult<()> {
        let _gate = self.begin_mutation()?;

        let request = {
            let state = self.state.read().await;
            if let Some(ParentRef::Category(category)) = state.tree.resolve_parent(path) {
                return Err(AppError::validation(format!(
                    "'{category}' is a fixed category and cannot be deleted"
                )));
            }
            let idx = state
                .tree
                .find_by_path(path)
                .ok_or_else(|| AppError::not_found(format!("Folder '{path}' not found")))?;
            let node = state.tree.node(idx);
            if !node.file_ids.is_empty() {
                return Err(AppError::validation(
                    "Remove or reassign files before deleting this sub folder.",
                ));
            }
            if !node.children.is_empty() {
                return Err(AppError::validation(
                    "Delete the folders inside this sub folder first.",
                ));
            }
            DeleteFolderRequest {
                path: node.relative_path.clone(),
            }
        };

        self.api.delete_folder(&request).await?;
        info!(path = %request.path, folder_id = %folder_id_for_path(&request.path), "Folder deleted");

        self.reload().await?;
        Ok(())
    }

    /// Upload a file into a category root or a leaf folder.
    pub async fn upload_file(
        &self,
        folder_path: &str,
        file_name: &str,
        mime_type: &str,
        content: Bytes,
    ) -> AppResult<()> {
        let _gate = self.begin_mutation()?;

        let file_name = file_name.trim();
        if file_name.is_empty() {
            return Err(AppError::validation("File name is required"));
        }

        let folder_path = {
            let state = self.state.read().await;
            match state.tree.resolve_parent(folder_path) {
                Some(ParentRef::Category(category)) => category.display_name().to_string(),
                Some(ParentRef::Folder(idx)) if state.tree.is_leaf(idx) => {
                    state.tree.node(idx).relative_path.clone()
                }
                Some(ParentRef::Folder(_)) => {
                    return Err(AppError::validation(
                        "Files can only be uploaded into a folder without sub folders.",
                    ));
                }
                None => {
                    return Err(AppError::not_found(format!(
                        "Folder '{folder_path}' not found"
                    )));
                }
            }
        };

        let size = content.len();
        self.api
            .upload_file(FileUpload {
                folder_path: folder_path.clone(),
                file_name: file_name.to_string(),
                mime_type: mime_type.to_string(),
                content,
            })
            .await?;
        info!(path = %folder_path, file_name = %file_name, size, "File uploaded");

        self.reload().await?;
        Ok(())
    }

    /// Delete a file on the server, identified by its url.
    pub async fn delete_file(&self, file_id: FileId) -> AppResult<()> {
        let _gate = self.begin_mutation()?;

        let request = {
            let state = self.state.read().await;
            let file = state
                .file(file_id)
                .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;
            DeleteFileRequest {
                file_path: file.url.clone(),
            }
        };

        self.api.delete_file(&request).await?;
        info!(file_id, url = %request.file_path, "File deleted");

        self.reload().await?;
        Ok(())
    }

    // ── Local organisation ──────────────────────────────────────────

    /// Move a file into the folder `target_id`, or its first leaf if it has children.
    ///
    /// Returns the id of the folder that received the file.
    pub async fn move_file_to_folder(&self, file_id: FileId, target_id: &str) -> AppResult<String> {
        let mut state = self.state.write().await;
        if state.file(file_id).is_none() {
            return Err(AppError::not_found(format!("File {file_id} not found")));
        }

        let placed = organize::move_file_to_folder(&mut state.tree, file_id, target_id)?;
        let folder_id = state.tree.node(placed).id.clone();
        info!(file_id, folder_id = %folder_id, "File moved");
        Ok(folder_id)
    }

    /// Flip a file's favourite flag and return the new value.
    pub async fn toggle_favorite(&self, file_id: FileId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let file = state
            .files
            .iter_mut()
            .find(|f| f.id == file_id)
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;
        file.favorite = !file.favorite;
        debug!(file_id, favorite = file.favorite, "Favourite toggled");
        Ok(file.favorite)
    }

    /// Remove a file from the file list and from every folder and category root.
    pub async fn remove_file(&self, file_id: FileId) -> AppResult<()> {
        let mut state = self.state.write().await;
        let before = state.files.len();
        state.files.retain(|f| f.id != file_id);
        if state.files.len() == before {
            return Err(AppError::not_found(format!("File {file_id} not found")));
        }

        let references = state.tree.remove_file_everywhere(file_id);
        info!(file_id, references, "File removed");
        Ok(())
    }

    /// Redistribute every known file at random.
    pub async fn distribute_files_randomly(&self) -> Vec<LeafAssignment> {
        let file_ids: Vec<FileId> = self.inspect(|s| s.files.iter().map(|f| f.id).collect()).await;
        let mut rng = StdRng::from_rng(&mut rand::rng());
        self.distribute_files_randomly_with(&file_ids, &mut rng).await
    }

    /// Redistribute `file_ids` using `rng`. Ids with no matching file are ignored.
    pub async fn distribute_files_randomly_with<R: Rng + ?Sized>(
        &self,
        file_ids: &[FileId],
        rng: &mut R,
    ) -> Vec<LeafAssignment> {
        let mut state = self.state.write().await;
        let known: Vec<FileId> = file_ids
            .iter()
            .copied()
            .filter(|&id| state.file(id).is_some())
            .collect();
        if known.len() < file_ids.len() {
            warn!(
                ignored = file_ids.len() - known.len(),
                "Ignoring unknown file ids during redistribution"
            );
        }

        let unsorted = match validate_name(&self.config.unsorted_folder_name) {
            Ok(name) => name.to_string(),
            Err(err) => {
                let fallback = GalleryConfig::default().unsorted_folder_name;
                warn!(error = %err, fallback = %fallback, "Unusable unsorted folder name");
                fallback
            }
        };
        let assignments = organize::distribute_randomly(&mut state.tree, &known, &unsorted, rng);
        info!(files = known.len(), leaves = assignments.len(), "Files redistributed");
        assignments
    }

    // ── Navigation ──────────────────────────────────────────────────

    /// Current breadcrumb.
    pub async fn breadcrumb(&self) -> Breadcrumb {
        self.state.read().await.breadcrumb.clone()
    }

    /// Resolved breadcrumb steps for display.
    pub async fn breadcrumb_steps(&self) -> Vec<BreadcrumbStep> {
        let state = self.state.read().await;
        state.breadcrumb.steps(&state.tree)
    }

    /// Open a category at its root.
    pub async fn open_category(&self, category: Category) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.tree.category(category).is_none() {
            return Err(AppError::not_found(format!("Category '{category}' not found")));
        }
        state.breadcrumb.open_category(category);
        Ok(())
    }

    /// Open a direct child of the current position.
    pub async fn open_folder(&self, folder_id: &str) -> AppResult<()> {
        let mut state = self.state.write().await;
        let GalleryState {
            tree, breadcrumb, ..
        } = &mut *state;
        breadcrumb.open_folder(tree, folder_id)
    }

    /// Step up one level.
    pub async fn go_up(&self) {
        self.state.write().await.breadcrumb.go_up();
    }

    /// Truncate the breadcrumb to `depth` folders.
    pub async fn go_to(&self, depth: usize) {
        self.state.write().await.breadcrumb.go_to(depth);
    }
}

fn id_taken(path: &str) -> AppError {
    AppError::validation(format!(
        "A folder with an equivalent name already exists ('{}').",
        folder_id_for_path(path)
    ))
}

fn validate_name(name: &str) -> AppResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Folder name is required"));
    }
    if name.contains('/') {
        return Err(AppError::validation("Folder name cannot contain '/'"));
    }
    Ok(name)
}
