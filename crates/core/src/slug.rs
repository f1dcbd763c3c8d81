use std::path::{Component, Path};
use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Lower-case the value and replace each whitespace run with a single hyphen
pub fn category_slug(category: &str) -> String {
    WHITESPACE_RUN
        .replace_all(&category.to_lowercase(), "-")
        .into_owned()
}

/// Slugify one path segment the way heading anchors are generated:
/// lower-case, punctuation dropped, each space becomes a hyphen
pub fn slugify_segment(segment: &str) -> String {
    segment
        .trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            '-' | '_' => Some(c),
            c if c.is_alphanumeric() => Some(c),
            _ => None,
        })
        .collect()
}

/// Derive an entry id from a content file path relative to the collection
/// directory: extension dropped, every segment slugified, joined with `/`
pub fn entry_id(relative: &Path) -> String {
    let without_ext = relative.with_extension("");
    without_ext
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(slugify_segment(&part.to_string_lossy())),
            _ => None,
        })
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Slugify a `/`-separated path given by hand, e.g. a front-matter `slug`.
/// Empty, `.` and `..` segments drop out, so the result never climbs.
pub fn slugify_path(path: &str) -> String {
    path.split('/')
        .map(slugify_segment)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
