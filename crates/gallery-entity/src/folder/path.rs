//! Relative path and folder id helpers.
//!
//! A relative path is the `/`-joined list of names from the category root
//! down to a folder, e.g. `Ad Content/Promo Clips`. A folder id is always
//! derived from it: every segment is slugified and the slugs are joined
//! with `-`, giving `ad-content-promo-clips`.

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '/';

/// Lowercase, collapse every run of non `[a-z0-9]` characters to a single
/// hyphen, and trim hyphens from both ends.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_hyphen = false;

    for c in value.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Slug for a single path segment.
///
/// Names with no ASCII alphanumerics (Thai folder names, emoji) would
/// slugify to nothing, so they are spelled out as hex code points instead.
pub fn segment_slug(segment: &str) -> String {
    let slug = slugify(segment);
    if !slug.is_empty() {
        return slug;
    }

    let mut encoded = String::from("x");
    for c in segment.trim().chars() {
        encoded.push_str(&format!("{:x}", c as u32));
    }
    encoded
}

/// Split a path into its non-empty, trimmed segments.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split(PATH_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Canonical spelling of a path: no leading, trailing, or doubled separators.
pub fn normalize_path(path: &str) -> String {
    split_path(path).join("/")
}

/// Append a child name to a parent path.
pub fn join_path(parent: &str, name: &str) -> String {
    let parent = normalize_path(parent);
    let name = name.trim();
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}{PATH_SEPARATOR}{name}")
    }
}

/// Path of the parent, or `None` for a single-segment path.
pub fn parent_path(path: &str) -> Option<String> {
    let segments = split_path(path);
    if segments.len() < 2 {
        return None;
    }
    Some(segments[..segments.len() - 1].join("/"))
}

/// Last segment of a path.
pub fn leaf_name(path: &str) -> Option<&str> {
    split_path(path).last().copied()
}

/// Derive the folder id for a relative path.
pub fn folder_id_for_path(path: &str) -> String {
    split_path(path)
        .into_iter()
        .map(segment_slug)
        .collect::<Vec<_>>()
        .join("-")
}

/// Whether `path` equals `ancestor` or lies below it.
pub fn is_same_or_descendant(path: &str, ancestor: &str) -> bool {
    let path = split_path(path);
    let ancestor = split_path(ancestor);
    path.len() >= ancestor.len() && path[..ancestor.len()] == ancestor[..]
}

/// Replace the `old_prefix` segments of `path` with `new_prefix`.
///
/// Returns `None` when `path` is not at or below `old_prefix`.
pub fn rebase_path(path: &str, old_prefix: &str, new_prefix: &str) -> Option<String> {
    if !is_same_or_descendant(path, old_prefix) {
        return None;
    }
    let rest = &split_path(path)[split_path(old_prefix).len()..];
    let mut segments = split_path(new_prefix);
    segments.extend_from_slice(rest);
    Some(segments.join("/"))
}

/// Case-insensitive sibling name comparison.
pub fn names_collide(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
