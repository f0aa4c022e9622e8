//! Request bodies. Field names follow the server's camelCase contract.

use serde::{Deserialize, Serialize};

/// `POST` body creating a subfolder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    /// Relative path of the category root or folder to create under.
    pub parent_path: String,
    /// Name of the new folder.
    pub folder_name: String,
}

/// `PATCH` body renaming a folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameFolderRequest {
    /// Relative path of the folder as it is now.
    pub current_path: String,
    /// New display name.
    pub new_name: String,
}

/// `DELETE` body removing a folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteFolderRequest {
    /// Relative path of the folder.
    pub path: String,
}

/// `DELETE` body removing a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFileRequest {
    /// The file's url, which identifies it on the server.
    pub file_path: String,
}
