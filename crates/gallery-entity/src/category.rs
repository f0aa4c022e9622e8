//! Fixed top-level gallery categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::folder::path::slugify;

/// The predefined roots under which every folder tree is organized.
///
/// Categories are not user-creatable. The declaration order is the display
/// order and the order used when redistributing files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Campaign-ready media assets.
    AdContent,
    /// Testimonials and consultation highlights.
    CustomerReviews,
    /// Before/after and product visuals.
    Branding,
    /// Slides, events, and keynote clips.
    Presentations,
    /// Training and raw recordings.
    AllFootages,
    /// Miscellaneous resources.
    OtherFiles,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 6] = [
        Self::AdContent,
        Self::CustomerReviews,
        Self::Branding,
        Self::Presentations,
        Self::AllFootages,
        Self::OtherFiles,
    ];

    /// Return the id-safe slug, which is also the category root's folder id.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::AdContent => "ad-content",
            Self::CustomerReviews => "customer-reviews",
            Self::Branding => "branding",
            Self::Presentations => "presentations",
            Self::AllFootages => "all-footages",
            Self::OtherFiles => "other-files",
        }
    }

    /// Return the display name, which is also the first segment of every path below it.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::AdContent => "Ad Content",
            Self::CustomerReviews => "Customer Reviews",
            Self::Branding => "Branding",
            Self::Presentations => "Presentations",
            Self::AllFootages => "All Footages",
            Self::OtherFiles => "Other Files",
        }
    }

    /// Return a one-line description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::AdContent => "Campaign-ready media assets",
            Self::CustomerReviews => "Testimonials & consultation highlights",
            Self::Branding => "Before/After & product visuals",
            Self::Presentations => "Slides, events & keynote clips",
            Self::AllFootages => "Training & raw recordings",
            Self::OtherFiles => "Miscellaneous resources",
        }
    }

    /// Resolve a display name or slug, compared by slug.
    pub fn from_name(name: &str) -> Option<Self> {
        let slug = slugify(name);
        Self::ALL.into_iter().find(|c| c.slug() == slug)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Category {
    type Err = gallery_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            let known: Vec<&str> = Self::ALL.iter().map(|c| c.slug()).collect();
            gallery_core::AppError::validation(format!(
                "Unknown category: '{s}'. Expected one of: {}",
                known.join(", ")
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_matches_display_name() {
        for category in Category::ALL {
            assert_eq!(slugify(category.display_name()), category.slug());
        }
    }

    #[test]
    fn test_from_str_accepts_name_or_slug() {
        assert_eq!("Ad Content".parse::<Category>().unwrap(), Category::AdContent);
        assert_eq!("all-footages".parse::<Category>().unwrap(), Category::AllFootages);
        assert_eq!("OTHER FILES".parse::<Category>().unwrap(), Category::OtherFiles);
        assert!("Unsorted".parse::<Category>().is_err());
    }

    #[test]
    fn test_serde_uses_slug() {
        let json = serde_json::to_string(&Category::CustomerReviews).unwrap();
        assert_eq!(json, "\"customer-reviews\"");
    }
}
