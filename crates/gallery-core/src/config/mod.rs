//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field has a default so a missing file is valid.

pub mod api;
pub mod gallery;
pub mod logging;

use std::path::Path;

use serde::{Deserialize, Serialize};

use self::api::ApiConfig;
use self::gallery::GalleryConfig;
use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Gallery server endpoints.
    #[serde(default)]
    pub api: ApiConfig,
    /// Client-side gallery defaults.
    #[serde(default)]
    pub gallery: GalleryConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Reads `path`, then an optional `<env>.toml` overlay next to it, then
    /// environment variables prefixed with `GALLERY__`
    /// (e.g. `GALLERY__API__BASE_URL`).
    pub fn load(path: impl AsRef<Path>, env: Option<&str>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let mut builder =
            config::Config::builder().add_source(config::File::from(path).required(false));

        if let Some(env) = env {
            let overlay = path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(format!("{env}.toml"));
            builder = builder.add_source(config::File::from(overlay).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("GALLERY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section for values that deserialize but cannot be used.
    pub fn validate(&self) -> Result<(), AppError> {
        self.api.validate()?;
        self.gallery.validate()
    }
}
