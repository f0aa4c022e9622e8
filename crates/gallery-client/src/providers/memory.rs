//! In-memory folder provider.
//!
//! Holds the server-side tree in process and applies the same rules the
//! gallery server does, so the tree manager can run without a network.
//! Nothing survives the process.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_entity::folder::path::{
    folder_id_for_path, is_same_or_descendant, join_path, names_collide, normalize_path,
    parent_path, rebase_path, split_path,
};
use gallery_entity::file::format_human_size;
use gallery_entity::{Category, FileId, MediaFile, MediaType};

use crate::api::{FileUpload, FolderApi};
use crate::dto::{
    CreateFolderRequest, DeleteFileRequest, DeleteFolderRequest, FolderListing,
    RemoteFolderNode, RenameFolderRequest, RenameFolderResponse,
};

#[derive(Debug, Default)]
struct MemoryState {
    folders: Vec<RemoteFolderNode>,
    files: Vec<MediaFile>,
}

/// Process-local stand-in for the gallery server.
#[derive(Debug, Clone)]
pub struct MemoryFolderApi {
    state: Arc<RwLock<MemoryState>>,
    requests: Arc<AtomicUsize>,
    latency: Option<Duration>,
    injected_failure: Arc<Mutex<Option<AppError>>>,
}

impl Default for MemoryFolderApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFolderApi {
    /// Start with every category root and no folders or files.
    pub fn new() -> Self {
        let folders = Category::ALL
            .iter()
            .map(|c| RemoteFolderNode::new(c.display_name(), c.display_name()))
            .collect();
        Self::with_listing(FolderListing {
            folders,
            files: Vec::new(),
        })
    }

    /// Start from an existing listing.
    pub fn with_listing(listing: FolderListing) -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState {
                folders: listing.folders,
                files: listing.files,
            })),
            requests: Arc::new(AtomicUsize::new(0)),
            latency: None,
            injected_failure: Arc::new(Mutex::new(None)),
        }
    }

    /// Delay every request, to exercise in-flight behaviour.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Make the next mutating request fail with `error`.
    pub async fn fail_next(&self, error: AppError) {
        *self.injected_failure.lock().await = Some(error);
    }

    /// Add a file to the flat list and to the node at `folder_path`.
    pub async fn seed_file(&self, folder_path: &str, file: MediaFile) -> AppResult<()> {
        let mut state = self.state.write().await;
        let node = find_node_mut(&mut state.folders, &normalize_path(folder_path))
            .ok_or_else(|| AppError::not_found(format!("Folder not found: {folder_path}")))?;
        node.file_ids.push(file.id);
        state.files.push(file);
        Ok(())
    }

    async fn begin(&self, operation: &str) -> AppResult<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        debug!(operation, "Memory folder request");
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        Ok(())
    }

    async fn take_failure(&self) -> AppResult<()> {
        match self.injected_failure.lock().await.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl FolderApi for MemoryFolderApi {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn list(&self) -> AppResult<FolderListing> {
        self.begin("list").await?;
        let state = self.state.read().await;
        Ok(FolderListing {
            folders: state.folders.clone(),
            files: state.files.clone(),
        })
    }

    async fn create_folder(&self, request: &CreateFolderRequest) -> AppResult<()> {
        self.begin("create_folder").await?;
        self.take_failure().await?;

        let name = request.folder_name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Folder name is required"));
        }

        let mut state = self.state.write().await;
        let parent_path = normalize_path(&request.parent_path);
        let parent = find_node_mut(&mut state.folders, &parent_path)
            .ok_or_else(|| AppError::not_found("Parent folder not found"))?;

        if parent.children.iter().any(|c| names_collide(&c.name, name)) {
            return Err(AppError::conflict(format!(
                "A folder named '{name}' already exists"
            )));
        }

        let path = join_path(&parent_path, name);
        let mut node = RemoteFolderNode::new(name, path.clone());
        node.id = Some(folder_id_for_path(&path));
        parent.children.push(node);
        Ok(())
    }

    async fn rename_folder(
        &self,
        request: &RenameFolderRequest,
    ) -> AppResult<RenameFolderResponse> {
        self.begin("rename_folder").await?;
        self.take_failure().await?;

        let new_name = request.new_name.trim();
        if new_name.is_empty() {
            return Err(AppError::validation("New folder name is required"));
        }

        let current = normalize_path(&request.current_path);
        let parent = parent_path(&current)
            .ok_or_else(|| AppError::validation("Category folders cannot be renamed"))?;

        let mut state = self.state.write().await;
        let siblings = &mut find_node_mut(&mut state.folders, &parent)
            .ok_or_else(|| AppError::not_found("Folder not found"))?
            .children;

        let pos = siblings
            .iter()
            .position(|c| c.path == current)
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        if siblings
            .iter()
            .enumerate()
            .any(|(i, c)| i != pos && names_collide(&c.name, new_name))
        {
            return Err(AppError::conflict(format!(
                "A folder named '{new_name}' already exists"
            )));
        }

        let new_path = join_path(&parent, new_name);
        let node = &mut siblings[pos];
        node.name = new_name.to_string();
        rebase_subtree(node, &current, &new_path);

        Ok(RenameFolderResponse {
            id: Some(folder_id_for_path(&new_path)),
            path: new_path,
        })
    }

    async fn delete_folder(&self, request: &DeleteFolderRequest) -> AppResult<()> {
        self.begin("delete_folder").await?;
        self.take_failure().await?;

        let path = normalize_path(&request.path);
        let parent = parent_path(&path)
            .ok_or_else(|| AppError::validation("Category folders cannot be deleted"))?;

        let mut state = self.state.write().await;
        let siblings = &mut find_node_mut(&mut state.folders, &parent)
            .ok_or_else(|| AppError::not_found("Folder not found"))?
            .children;
        let pos = siblings
            .iter()
            .position(|c| c.path == path)
            .ok_or_else(|| AppError::not_found("Folder not found"))?;

        if !siblings[pos].file_ids.is_empty() || !siblings[pos].children.is_empty() {
            return Err(AppError::conflict("Folder is not empty"));
        }
        siblings.remove(pos);
        Ok(())
    }

    async fn upload_file(&self, upload: FileUpload) -> AppResult<()> {
        self.begin("upload_file").await?;
        self.take_failure().await?;

        let folder_path = normalize_path(&upload.folder_path);
        let mut state = self.state.write().await;
        let next_id: FileId = state.files.iter().map(|f| f.id).max().unwrap_or(0) + 1;

        let node = find_node_mut(&mut state.folders, &folder_path)
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        let is_category_root = split_path(&folder_path).len() == 1;
        if !is_category_root && !node.children.is_empty() {
            return Err(AppError::validation(
                "Files can only be uploaded into folders without subfolders",
            ));
        }
        node.file_ids.push(next_id);
        let category = split_path(&folder_path)
            .first()
            .map(|s| s.to_string())
            .unwrap_or_default();

        let media_type = if upload.mime_type.starts_with("video/") {
            MediaType::Video
        } else {
            MediaType::Image
        };
        // The id prefix keeps urls unique when a name is uploaded twice.
        let url = format!(
            "/uploads/{}/{next_id}-{}",
            folder_id_for_path(&folder_path),
            upload.file_name
        );
        state.files.push(MediaFile {
            id: next_id,
            name: upload.file_name,
            media_type,
            thumbnail: url.clone(),
            url,
            size: format_human_size(upload.content.len() as u64),
            date: chrono::Utc::now().date_naive().to_string(),
            tags: Vec::new(),
            favorite: false,
            views: 0,
            duration: None,
            category,
        });
        Ok(())
    }

    async fn delete_file(&self, request: &DeleteFileRequest) -> AppResult<()> {
        self.begin("delete_file").await?;
        self.take_failure().await?;

        let mut state = self.state.write().await;
        let pos = state
            .files
            .iter()
            .position(|f| f.url == request.file_path)
            .ok_or_else(|| AppError::not_found("File not found"))?;
        let file = state.files.remove(pos);
        strip_file(&mut state.folders, file.id);
        Ok(())
    }
}

fn find_node_mut<'a>(
    nodes: &'a mut [RemoteFolderNode],
    path: &str,
) -> Option<&'a mut RemoteFolderNode> {
    for node in nodes.iter_mut() {
        if node.path == path {
            return Some(node);
        }
        if is_same_or_descendant(path, &node.path) {
            return find_node_mut(&mut node.children, path);
        }
    }
    None
}

fn rebase_subtree(node: &mut RemoteFolderNode, old_prefix: &str, new_prefix: &str) {
    if let Some(rebased) = rebase_path(&node.path, old_prefix, new_prefix) {
        node.id = Some(folder_id_for_path(&rebased));
        node.path = rebased;
    }
    for child in &mut node.children {
        rebase_subtree(child, old_prefix, new_prefix);
    }
}

fn strip_file(nodes: &mut [RemoteFolderNode], file_id: FileId) {
    for node in nodes {
        node.file_ids.retain(|&id| id != file_id);
        strip_file(&mut node.children, file_id);
    }
}
