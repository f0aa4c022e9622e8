//! Gallery server connection configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Where the folder/file REST endpoints live and how to reach them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Scheme, host, and port of the gallery server.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Folder listing / create / rename / delete endpoint.
    #[serde(default = "default_folders_path")]
    pub folders_path: String,
    /// Multipart file upload endpoint.
    #[serde(default = "default_upload_path")]
    pub upload_path: String,
    /// File deletion endpoint.
    #[serde(default = "default_files_path")]
    pub files_path: String,
    /// Whole-request timeout in seconds. Unset keeps the transport default.
    #[serde(default)]
    pub request_timeout_seconds: Option<u64>,
    /// Connect timeout in seconds. Unset keeps the transport default.
    #[serde(default)]
    pub connect_timeout_seconds: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            folders_path: default_folders_path(),
            upload_path: default_upload_path(),
            files_path: default_files_path(),
            request_timeout_seconds: None,
            connect_timeout_seconds: None,
        }
    }
}

impl ApiConfig {
    /// Check the base URL has an HTTP scheme and endpoints are absolute paths.
    pub fn validate(&self) -> Result<(), AppError> {
        let base = self.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(AppError::configuration(format!(
                "api.base_url '{base}' must start with http:// or https://"
            )));
        }
        for (key, path) in [
            ("folders_path", &self.folders_path),
            ("upload_path", &self.upload_path),
            ("files_path", &self.files_path),
        ] {
            if !path.starts_with('/') {
                return Err(AppError::configuration(format!(
                    "api.{key} '{path}' must start with '/'"
                )));
            }
        }
        Ok(())
    }

    /// Join the base URL with an endpoint path.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_folders_path() -> String {
    "/api/marketing-folders".to_string()
}

fn default_upload_path() -> String {
    "/api/marketing-folders/upload".to_string()
}

fn default_files_path() -> String {
    "/api/marketing-folders/files".to_string()
}
