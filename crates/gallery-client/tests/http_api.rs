//! HTTP provider against a local axum server.

use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use bytes::Bytes;
use serde_json::{Value, json};

use gallery_client::dto::{
    CreateFolderRequest, DeleteFileRequest, DeleteFolderRequest, RenameFolderRequest,
};
use gallery_client::{FileUpload, FolderApi, HttpFolderApi};
use gallery_core::config::api::ApiConfig;
use gallery_core::error::ErrorKind;

#[derive(Clone, Default)]
struct Recorder {
    calls: Arc<Mutex<Vec<(String, Value)>>>,
}

impl Recorder {
    fn push(&self, method: &str, body: Value) {
        self.calls.lock().unwrap().push((method.to_string(), body));
    }

    fn last(&self) -> (String, Value) {
        self.calls.lock().unwrap().last().cloned().unwrap()
    }
}

async fn list_folders() -> Json<Value> {
    Json(json!({
        "folders": [{
            "id": "branding",
            "name": "Branding",
            "path": "Branding",
            "fileIds": [1],
            "children": [{ "name": "Logos", "path": "Branding/Logos", "fileIds": [2] }]
        }],
        "files": [
            { "id": 1, "name": "cover.jpg", "type": "image", "url": "/uploads/cover.jpg", "size": "1.2 MB", "date": "2025-01-02" },
            { "id": 2, "name": "logo.png", "type": "image", "url": "/uploads/logo.png" }
        ]
    }))
}

async fn create_folder(State(rec): State<Recorder>, Json(body): Json<Value>) -> Response {
    rec.push("POST", body.clone());
    if body["folderName"] == "Taken" {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "error": "Folder already exists" })),
        )
            .into_response();
    }
    (StatusCode::CREATED, Json(json!({ "success": true }))).into_response()
}

async fn rename_folder(State(rec): State<Recorder>, Json(body): Json<Value>) -> Response {
    rec.push("PATCH", body.clone());
    if body["newName"] == "Quiet" {
        return StatusCode::OK.into_response();
    }
    Json(json!({ "path": "Branding/Brand Kit" })).into_response()
}

async fn delete_folder(State(rec): State<Recorder>, Json(body): Json<Value>) -> Response {
    rec.push("DELETE", body.clone());
    if body["path"] == "Branding/Broken" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "<html>boom</html>").into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn upload_file(State(rec): State<Recorder>, mut multipart: Multipart) -> Response {
    let mut folder_path = None;
    let mut file_name = None;
    let mut content_type = None;
    let mut len = 0;

    while let Ok(Some(field)) = multipart.next_field().await {
        match field.name().unwrap_or("") {
            "folderPath" => folder_path = field.text().await.ok(),
            "file" => {
                file_name = field.file_name().map(String::from);
                content_type = field.content_type().map(String::from);
                len = field.bytes().await.map(|b| b.len()).unwrap_or(0);
            }
            _ => {}
        }
    }

    rec.push(
        "UPLOAD",
        json!({
            "folderPath": folder_path,
            "fileName": file_name,
            "contentType": content_type,
            "len": len,
        }),
    );
    StatusCode::CREATED.into_response()
}

async fn delete_file(State(rec): State<Recorder>, Json(body): Json<Value>) -> Response {
    rec.push("DELETE_FILE", body);
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "", "message": "File not found" })),
    )
        .into_response()
}

async fn spawn_server() -> (HttpFolderApi, Recorder) {
    let recorder = Recorder::default();
    let app = Router::new()
        .route(
            "/api/marketing-folders",
            get(list_folders)
                .post(create_folder)
                .patch(rename_folder)
                .delete(delete_folder),
        )
        .route("/api/marketing-folders/upload", post(upload_file))
        .route("/api/marketing-folders/files", delete(delete_file))
        .with_state(recorder.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = ApiConfig {
        base_url: format!("http://{addr}/"),
        request_timeout_seconds: Some(5),
        ..ApiConfig::default()
    };
    (HttpFolderApi::new(&config).unwrap(), recorder)
}

#[tokio::test]
async fn test_list_decodes_nested_listing() {
    let (api, _) = spawn_server().await;
    let listing = api.list().await.unwrap();

    assert_eq!(listing.folders.len(), 1);
    assert_eq!(listing.folders[0].file_ids, vec![1]);
    assert_eq!(listing.folders[0].children[0].path, "Branding/Logos");
    assert_eq!(listing.files[1].size, "");
}

#[tokio::test]
async fn test_create_sends_camel_case_body() {
    let (api, rec) = spawn_server().await;
    api.create_folder(&CreateFolderRequest {
        parent_path: "Branding".to_string(),
        folder_name: "Logos 2025".to_string(),
    })
    .await
    .unwrap();

    let (method, body) = rec.last();
    assert_eq!(method, "POST");
    assert_eq!(body, json!({ "parentPath": "Branding", "folderName": "Logos 2025" }));
}

#[tokio::test]
async fn test_create_conflict_surfaces_server_message() {
    let (api, _) = spawn_server().await;
    let err = api
        .create_folder(&CreateFolderRequest {
            parent_path: "Branding".to_string(),
            folder_name: "Taken".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(err.message, "Folder already exists");
}

#[tokio::test]
async fn test_rename_returns_new_path() {
    let (api, rec) = spawn_server().await;
    let response = api
        .rename_folder(&RenameFolderRequest {
            current_path: "Branding/Logos".to_string(),
            new_name: "Brand Kit".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.path, "Branding/Brand Kit");
    assert_eq!(response.id, None);
    assert_eq!(
        rec.last().1,
        json!({ "currentPath": "Branding/Logos", "newName": "Brand Kit" })
    );
}

#[tokio::test]
async fn test_rename_tolerates_empty_body() {
    let (api, _) = spawn_server().await;
    let response = api
        .rename_folder(&RenameFolderRequest {
            current_path: "Branding/Logos".to_string(),
            new_name: "Quiet".to_string(),
        })
        .await
        .unwrap();
    assert!(response.path.is_empty());
}

#[tokio::test]
async fn test_delete_folder_falls_back_to_generic_message() {
    let (api, rec) = spawn_server().await;
    api.delete_folder(&DeleteFolderRequest {
        path: "Branding/Logos".to_string(),
    })
    .await
    .unwrap();
    assert_eq!(rec.last().1, json!({ "path": "Branding/Logos" }));

    let err = api
        .delete_folder(&DeleteFolderRequest {
            path: "Branding/Broken".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExternalService);
    assert_eq!(err.message, "Request failed with status 500");
}

#[tokio::test]
async fn test_upload_sends_multipart_fields() {
    let (api, rec) = spawn_server().await;
    api.upload_file(FileUpload {
        folder_path: "Branding/Logos".to_string(),
        file_name: "mark.png".to_string(),
        mime_type: "image/png".to_string(),
        content: Bytes::from_static(&[0u8; 64]),
    })
    .await
    .unwrap();

    let (method, body) = rec.last();
    assert_eq!(method, "UPLOAD");
    assert_eq!(body["folderPath"], "Branding/Logos");
    assert_eq!(body["fileName"], "mark.png");
    assert_eq!(body["contentType"], "image/png");
    assert_eq!(body["len"], 64);
}

#[tokio::test]
async fn test_delete_file_skips_blank_error_field() {
    let (api, rec) = spawn_server().await;
    let err = api
        .delete_file(&DeleteFileRequest {
            file_path: "/uploads/gone.jpg".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(rec.last().1, json!({ "filePath": "/uploads/gone.jpg" }));
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(err.message, "File not found");
}

#[tokio::test]
async fn test_unreachable_server_is_external_service_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ApiConfig {
        base_url: format!("http://{addr}"),
        ..ApiConfig::default()
    };
    let api = HttpFolderApi::new(&config).unwrap();
    let err = api.list().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExternalService);
    assert!(err.message.starts_with("Could not reach gallery server"));
}
