//! Media file entity model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Integer file identifier assigned by the gallery server.
pub type FileId = i64;

/// Kind of media asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Still image.
    Image,
    /// Full-length video.
    Video,
    /// Short clip.
    Clip,
}

impl MediaType {
    /// Return the type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Clip => "clip",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = gallery_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            "clip" => Ok(Self::Clip),
            _ => Err(gallery_core::AppError::validation(format!(
                "Invalid media type: '{s}'. Expected one of: image, video, clip"
            ))),
        }
    }
}

/// A media asset in the gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaFile {
    /// Unique file identifier.
    pub id: FileId,
    /// Display file name (including extension).
    pub name: String,
    /// Kind of media.
    #[serde(rename = "type")]
    pub media_type: MediaType,
    /// Where the asset is served from. Also identifies it for deletion.
    pub url: String,
    /// Preview image URL.
    #[serde(default)]
    pub thumbnail: String,
    /// Human-readable size, e.g. `"2.4 MB"`.
    #[serde(default)]
    pub size: String,
    /// Upload date, `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether the file is starred.
    #[serde(default)]
    pub favorite: bool,
    /// View count.
    #[serde(default)]
    pub views: u64,
    /// Playback duration for videos and clips, e.g. `"12:45"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    /// Origin label the asset was filed under.
    #[serde(default)]
    pub category: String,
}

impl MediaFile {
    /// Parse the upload date. Accepts a bare date or a timestamp starting with one.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let head = self.date.get(..10).unwrap_or(&self.date);
        NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
    }

    /// Convert the human-readable size into bytes.
    pub fn size_in_bytes(&self) -> Option<f64> {
        parse_human_size(&self.size)
    }

    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.name)
            .map(|ext| ext.to_lowercase())
    }
}

/// Parse sizes such as `"45.8 MB"`, `"512KB"`, or `"1024"` into bytes.
///
/// Units are binary multiples. A bare number is taken as bytes.
pub fn parse_human_size(size: &str) -> Option<f64> {
    let trimmed = size.trim();
    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);
    let value: f64 = number.parse().ok()?;

    let multiplier = match unit.trim().to_ascii_uppercase().as_str() {
        "" | "B" => 1.0,
        "KB" | "K" => 1024.0,
        "MB" | "M" => 1024.0 * 1024.0,
        "GB" | "G" => 1024.0 * 1024.0 * 1024.0,
        "TB" | "T" => 1024.0 * 1024.0 * 1024.0 * 1024.0,
        _ => return None,
    };

    Some(value * multiplier)
}

/// Render a byte count the way the gallery lists sizes, e.g. `"2.4 MB"`.
pub fn format_human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
