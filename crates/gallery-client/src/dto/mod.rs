//! Wire DTOs for the folder endpoints.

pub mod request;
pub mod response;

pub use request::{CreateFolderRequest, DeleteFileRequest, DeleteFolderRequest, RenameFolderRequest};
pub use response::{ApiErrorBody, FolderListing, RemoteFolderNode, RenameFolderResponse};
