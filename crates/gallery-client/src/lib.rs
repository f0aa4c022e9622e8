//! # gallery-client
//!
//! The gallery server's folder/file contract: request and response DTOs,
//! the [`FolderApi`] trait the tree manager talks to, and two providers.
//! [`HttpFolderApi`] speaks JSON over HTTP; [`MemoryFolderApi`] keeps a
//! process-local mirror and is the non-persistent variant.

pub mod api;
pub mod dto;
pub mod providers;

pub use api::{FileUpload, FolderApi};
pub use providers::http::HttpFolderApi;
pub use providers::memory::MemoryFolderApi;
