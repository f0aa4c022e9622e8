//! Gallery behaviour configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::types::{SortDirection, SortKey};

/// Client-side gallery defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    /// Name of the leaf created in categories without folders during redistribution.
    #[serde(default = "default_unsorted_folder_name")]
    pub unsorted_folder_name: String,
    /// Sort key used when a listing does not ask for one.
    #[serde(default)]
    pub default_sort: SortKey,
    /// Sort direction used when a listing does not ask for one.
    #[serde(default)]
    pub default_direction: SortDirection,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            unsorted_folder_name: default_unsorted_folder_name(),
            default_sort: SortKey::default(),
            default_direction: SortDirection::default(),
        }
    }
}

impl GalleryConfig {
    /// Check the unsorted leaf name can stand as a single folder name.
    pub fn validate(&self) -> Result<(), AppError> {
        let name = self.unsorted_folder_name.trim();
        if name.is_empty() {
            return Err(AppError::configuration(
                "gallery.unsorted_folder_name must not be blank",
            ));
        }
        if name.contains('/') {
            return Err(AppError::configuration(format!(
                "gallery.unsorted_folder_name '{name}' must not contain '/'"
            )));
        }
        Ok(())
    }
}

fn default_unsorted_folder_name() -> String {
    "Unsorted".to_string()
}
