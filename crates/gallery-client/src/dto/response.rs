//! Response bodies.

use serde::{Deserialize, Serialize};

use gallery_entity::{FileId, MediaFile};

/// One node of the server's nested folder listing.
///
/// Top-level nodes are category roots; their `fileIds` are the category's
/// root-level files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFolderNode {
    /// Server-assigned id. The client derives its own from the path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Files directly in this node.
    #[serde(default)]
    pub file_ids: Vec<FileId>,
    /// Relative path as the server knows it.
    #[serde(default)]
    pub path: String,
    /// Child folders.
    #[serde(default)]
    pub children: Vec<RemoteFolderNode>,
}

impl RemoteFolderNode {
    /// Create an empty node.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            file_ids: Vec::new(),
            path: path.into(),
            children: Vec::new(),
        }
    }
}

/// `GET` response: the whole tree plus the flat file list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FolderListing {
    /// Category roots with their nested folders.
    #[serde(default)]
    pub folders: Vec<RemoteFolderNode>,
    /// Every file the tree may reference.
    #[serde(default)]
    pub files: Vec<MediaFile>,
}

/// `PATCH` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameFolderResponse {
    /// New canonical relative path.
    #[serde(default)]
    pub path: String,
    /// New id, when the server supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Error payload returned with non-success statuses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Human-readable error.
    #[serde(default)]
    pub error: Option<String>,
    /// Alternative message field some endpoints use.
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// The first non-blank message the body carries.
    pub fn into_message(self) -> Option<String> {
        [self.error, self.message]
            .into_iter()
            .flatten()
            .map(|m| m.trim().to_string())
            .find(|m| !m.is_empty())
    }
}
