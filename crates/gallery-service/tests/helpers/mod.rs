//! Shared fixtures for tree manager integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use gallery_client::dto::{
    CreateFolderRequest, DeleteFileRequest, DeleteFolderRequest, FolderListing,
    RenameFolderRequest, RenameFolderResponse,
};
use gallery_client::{FileUpload, FolderApi, MemoryFolderApi};
use gallery_core::config::gallery::GalleryConfig;
use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_entity::{FileId, FolderTree, MediaFile, MediaType};
use gallery_service::FolderTreeManager;

/// A manager wired to an in-memory server.
pub struct TestGallery {
    /// Handle to the in-memory server, for seeding and request counts.
    pub api: MemoryFolderApi,
    /// Manager under test.
    pub manager: Arc<FolderTreeManager>,
}

impl TestGallery {
    /// All six categories, no folders, loaded.
    pub async fn new() -> Self {
        Self::with_api(MemoryFolderApi::new()).await
    }

    /// Wrap an existing server and run the initial load.
    pub async fn with_api(api: MemoryFolderApi) -> Self {
        Self::with_config(api, GalleryConfig::default()).await
    }

    /// Wrap an existing server with custom gallery settings.
    pub async fn with_config(api: MemoryFolderApi, config: GalleryConfig) -> Self {
        let manager = Arc::new(FolderTreeManager::new(Arc::new(api.clone()), config));
        manager.reload().await.expect("initial load");
        Self { api, manager }
    }

    /// Drive the manager through `backend` while keeping `api` for seeding.
    pub async fn with_backend(api: MemoryFolderApi, backend: Arc<dyn FolderApi>) -> Self {
        let manager = Arc::new(FolderTreeManager::new(backend, GalleryConfig::default()));
        manager.reload().await.expect("initial load");
        Self { api, manager }
    }

    /// Requests the server has received so far.
    pub fn requests(&self) -> usize {
        self.api.request_count()
    }

    /// Put a file on the server and reload.
    pub async fn seed_file(&self, folder_path: &str, file: MediaFile) {
        self.api.seed_file(folder_path, file).await.expect("seed file");
        self.manager.reload().await.expect("reload after seed");
    }

    /// Current tree.
    pub async fn tree(&self) -> FolderTree {
        self.manager.snapshot().await.tree
    }
}

/// An image file with sensible defaults.
pub fn media_file(id: FileId, name: &str) -> MediaFile {
    MediaFile {
        id,
        name: name.to_string(),
        media_type: MediaType::Image,
        url: format!("/uploads/{id}/{name}"),
        thumbnail: String::new(),
        size: "1.0 MB".to_string(),
        date: "2025-01-01".to_string(),
        tags: Vec::new(),
        favorite: false,
        views: 0,
        duration: None,
        category: String::new(),
    }
}

/// In-memory server whose responses can be bent out of the happy path.
#[derive(Debug, Clone)]
pub struct QuirkyApi {
    inner: MemoryFolderApi,
    /// Answer renames with an empty `path`.
    pub omit_rename_path: bool,
    /// Fail every listing while set.
    pub fail_listing: Arc<AtomicBool>,
}

impl QuirkyApi {
    pub fn new(inner: MemoryFolderApi) -> Self {
        Self {
            inner,
            omit_rename_path: false,
            fail_listing: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait]
impl FolderApi for QuirkyApi {
    fn provider_type(&self) -> &str {
        "quirky"
    }

    async fn list(&self) -> AppResult<FolderListing> {
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(AppError::external_service("Listing unavailable"));
        }
        self.inner.list().await
    }

    async fn create_folder(&self, request: &CreateFolderRequest) -> AppResult<()> {
        self.inner.create_folder(request).await
    }

    async fn rename_folder(&self, request: &RenameFolderRequest) -> AppResult<RenameFolderResponse> {
        let mut response = self.inner.rename_folder(request).await?;
        if self.omit_rename_path {
            response.path = String::new();
            response.id = None;
        }
        Ok(response)
    }

    async fn delete_folder(&self, request: &DeleteFolderRequest) -> AppResult<()> {
        self.inner.delete_folder(request).await
    }

    async fn upload_file(&self, upload: FileUpload) -> AppResult<()> {
        self.inner.upload_file(upload).await
    }

    async fn delete_file(&self, request: &DeleteFileRequest) -> AppResult<()> {
        self.inner.delete_file(request).await
    }
}
