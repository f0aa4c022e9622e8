//! The folder server contract as seen by the tree manager.

use async_trait::async_trait;
use bytes::Bytes;

use gallery_core::result::AppResult;

use crate::dto::{
    CreateFolderRequest, DeleteFileRequest, DeleteFolderRequest, FolderListing,
    RenameFolderRequest, RenameFolderResponse,
};

/// A file to upload into a folder.
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// Relative path of the target category root or leaf folder.
    pub folder_path: String,
    /// File name to store.
    pub file_name: String,
    /// MIME type sent with the part.
    pub mime_type: String,
    /// File content.
    pub content: Bytes,
}

/// Trait for gallery folder backends.
///
/// Every method is a single request. Implementations report failures as an
/// `AppError` whose message is fit for display; they never retry.
#[async_trait]
pub trait FolderApi: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g. "http", "memory").
    fn provider_type(&self) -> &str;

    /// Fetch the full folder tree and file list.
    async fn list(&self) -> AppResult<FolderListing>;

    /// Create a subfolder.
    async fn create_folder(&self, request: &CreateFolderRequest) -> AppResult<()>;

    /// Rename a folder, returning its new canonical path.
    async fn rename_folder(&self, request: &RenameFolderRequest)
    -> AppResult<RenameFolderResponse>;

    /// Delete a folder.
    async fn delete_folder(&self, request: &DeleteFolderRequest) -> AppResult<()>;

    /// Upload a file into a folder.
    async fn upload_file(&self, upload: FileUpload) -> AppResult<()>;

    /// Delete a file.
    async fn delete_file(&self, request: &DeleteFileRequest) -> AppResult<()>;
}
