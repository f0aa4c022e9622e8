//! HTTP folder provider backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use tracing::debug;

use gallery_core::config::api::ApiConfig;
use gallery_core::error::{AppError, ErrorKind};
use gallery_core::result::AppResult;

use crate::api::{FileUpload, FolderApi};
use crate::dto::{
    ApiErrorBody, CreateFolderRequest, DeleteFileRequest, DeleteFolderRequest, FolderListing,
    RenameFolderRequest, RenameFolderResponse,
};

/// Talks to the gallery server's JSON endpoints.
#[derive(Debug, Clone)]
pub struct HttpFolderApi {
    client: Client,
    config: ApiConfig,
}

impl HttpFolderApi {
    /// Build a provider from configuration.
    ///
    /// Timeouts are only set when configured; otherwise the transport defaults apply.
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = config.connect_timeout_seconds {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Failed to build HTTP client: {e}"),
                e,
            )
        })?;

        Ok(Self::with_client(client, config))
    }

    /// Build a provider around an existing client.
    pub fn with_client(client: Client, config: &ApiConfig) -> Self {
        Self {
            client,
            config: config.clone(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.config.url(path);
        debug!(%method, %url, "Dispatching gallery request");
        self.client.request(method, url)
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> AppResult<Response> {
        let response = self
            .request(method, path)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        ensure_success(response).await
    }
}

#[async_trait]
impl FolderApi for HttpFolderApi {
    fn provider_type(&self) -> &str {
        "http"
    }

    async fn list(&self) -> AppResult<FolderListing> {
        let response = self
            .request(Method::GET, &self.config.folders_path)
            .send()
            .await
            .map_err(transport_error)?;
        let response = ensure_success(response).await?;
        response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Unexpected folder listing from server: {e}"),
                e,
            )
        })
    }

    async fn create_folder(&self, request: &CreateFolderRequest) -> AppResult<()> {
        self.send_json(Method::POST, &self.config.folders_path, request)
            .await?;
        Ok(())
    }

    async fn rename_folder(
        &self,
        request: &RenameFolderRequest,
    ) -> AppResult<RenameFolderResponse> {
        let response = self
            .send_json(Method::PATCH, &self.config.folders_path, request)
            .await?;
        let text = response.text().await.map_err(transport_error)?;
        if text.trim().is_empty() {
            return Ok(RenameFolderResponse {
                path: String::new(),
                id: None,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn delete_folder(&self, request: &DeleteFolderRequest) -> AppResult<()> {
        self.send_json(Method::DELETE, &self.config.folders_path, request)
            .await?;
        Ok(())
    }

    async fn upload_file(&self, upload: FileUpload) -> AppResult<()> {
        let part = Part::bytes(upload.content.to_vec())
            .file_name(upload.file_name)
            .mime_str(&upload.mime_type)
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Validation,
                    format!("Invalid MIME type '{}': {e}", upload.mime_type),
                    e,
                )
            })?;
        let form = Form::new()
            .text("folderPath", upload.folder_path)
            .part("file", part);

        let response = self
            .request(Method::POST, &self.config.upload_path)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn delete_file(&self, request: &DeleteFileRequest) -> AppResult<()> {
        self.send_json(Method::DELETE, &self.config.files_path, request)
            .await?;
        Ok(())
    }
}

/// Pass successful responses through; turn the rest into a displayable error.
async fn ensure_success(response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, &body))
}

/// Map a failed status and its body to an error, preferring the server's message.
pub fn status_error(status: StatusCode, body: &str) -> AppError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(ApiErrorBody::into_message)
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));

    let kind = match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ErrorKind::Validation,
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::CONFLICT => ErrorKind::Conflict,
        _ => ErrorKind::ExternalService,
    };

    AppError::new(kind, message)
}

fn transport_error(err: reqwest::Error) -> AppError {
    let message = if err.is_timeout() {
        format!("Gallery server timed out: {err}")
    } else {
        format!("Could not reach gallery server: {err}")
    };
    AppError::with_source(ErrorKind::ExternalService, message, err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_uses_server_message() {
        let err = status_error(StatusCode::CONFLICT, r#"{"error":"Folder already exists"}"#);
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.message, "Folder already exists");
    }

    #[test]
    fn test_status_error_falls_back_to_generic_message() {
        let err = status_error(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(err.kind, ErrorKind::ExternalService);
        assert_eq!(err.message, "Request failed with status 500");
    }

    #[test]
    fn test_status_error_kinds() {
        assert_eq!(status_error(StatusCode::BAD_REQUEST, "").kind, ErrorKind::Validation);
        assert_eq!(status_error(StatusCode::NOT_FOUND, "{}").kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_new_respects_optional_timeouts() {
        let config = ApiConfig {
            request_timeout_seconds: Some(5),
            ..ApiConfig::default()
        };
        let api = HttpFolderApi::new(&config).unwrap();
        assert_eq!(api.provider_type(), "http");
    }
}
