//! # gallery-core
//!
//! Core crate for the clinic media gallery. Contains configuration schemas,
//! shared sort types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other gallery crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
