//! Filtering and sorting of the files visible at a gallery position.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use gallery_core::config::gallery::GalleryConfig;
use gallery_core::types::{SortDirection, SortKey};
use gallery_entity::{FileId, FolderTree, MediaFile, MediaType, ParentRef};

/// Filters and ordering for a gallery file listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GalleryQuery {
    /// Only files of this kind.
    pub media_type: Option<MediaType>,
    /// Only files whose origin category matches, ignoring ASCII case.
    pub category: Option<String>,
    /// Only starred files.
    pub favorites_only: bool,
    /// Case-insensitive substring over name, tags and category.
    pub search: Option<String>,
    /// Sort field.
    pub sort_by: SortKey,
    /// Sort direction.
    pub direction: SortDirection,
}

impl GalleryQuery {
    /// A query with no filters using the configured default ordering.
    pub fn from_config(config: &GalleryConfig) -> Self {
        Self {
            sort_by: config.default_sort,
            direction: config.default_direction,
            ..Self::default()
        }
    }

    /// Whether a file passes every filter.
    pub fn matches(&self, file: &MediaFile) -> bool {
        if self.media_type.is_some_and(|t| t != file.media_type) {
            return false;
        }
        if let Some(category) = self.category.as_deref().map(str::trim) {
            if !category.is_empty() && !file.category.trim().eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if self.favorites_only && !file.favorite {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                file.name.to_lowercase().contains(&term)
                    || file.category.to_lowercase().contains(&term)
                    || file.tags.iter().any(|t| t.to_lowercase().contains(&term))
            }
        }
    }

    /// Filter, then stable-sort.
    pub fn apply<'a>(&self, files: impl IntoIterator<Item = &'a MediaFile>) -> Vec<&'a MediaFile> {
        let mut matched: Vec<&MediaFile> = files.into_iter().filter(|f| self.matches(f)).collect();
        matched.sort_by(|a, b| self.direction.apply(compare(self.sort_by, a, b)));
        matched
    }
}

/// Ascending comparison by `key`. Values that do not parse sort first.
fn compare(key: SortKey, a: &MediaFile, b: &MediaFile) -> Ordering {
    match key {
        SortKey::Date => a.parsed_date().cmp(&b.parsed_date()),
        SortKey::Name => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
        SortKey::Size => match (a.size_in_bytes(), b.size_in_bytes()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortKey::Views => a.views.cmp(&b.views),
    }
}

/// Files shown at `position`: everything when nothing is open, a category's
/// root files plus every folder's files, or a folder with its descendants.
///
/// Ids without a matching file are skipped and each file appears once.
pub fn visible_files<'a>(
    tree: &FolderTree,
    files: &'a [MediaFile],
    position: Option<ParentRef>,
) -> Vec<&'a MediaFile> {
    let ids: Vec<FileId> = match position {
        None => return files.iter().collect(),
        Some(ParentRef::Category(category)) => tree.category_file_ids(category),
        Some(ParentRef::Folder(idx)) => tree.all_file_ids(idx),
    };

    let by_id: HashMap<FileId, &MediaFile> = files.iter().map(|f| (f.id, f)).collect();
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(*id))
        .filter_map(|id| by_id.get(&id).copied())
        .collect()
}
