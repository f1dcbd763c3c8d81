use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Author used when a post does not name one
pub const DEFAULT_AUTHOR: &str = "Khoi Van";

/// Reading time reported when none is given and none is computed
pub const READING_TIME_PLACEHOLDER: &str = "5 min read";

/// Untyped front matter as read from a content file
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// A field whose values come from a fixed, closed set of names.
pub trait ClosedSet: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == s)
    }

    fn allowed() -> Vec<&'static str> {
        Self::ALL.iter().map(|v| v.as_str()).collect()
    }
}

/// Post category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Engineering,
    Life,
    #[default]
    Notes,
    Projects,
}

impl ClosedSet for Category {
    const ALL: &'static [Self] = &[
        Category::Engineering,
        Category::Life,
        Category::Notes,
        Category::Projects,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Category::Engineering => "engineering",
            Category::Life => "life",
            Category::Notes => "notes",
            Category::Projects => "projects",
        }
    }
}

/// Tone of a personal post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Technical,
    Personal,
    Reflective,
    Humorous,
}

impl ClosedSet for Mood {
    const ALL: &'static [Self] = &[
        Mood::Technical,
        Mood::Personal,
        Mood::Reflective,
        Mood::Humorous,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Mood::Technical => "technical",
            Mood::Personal => "personal",
            Mood::Reflective => "reflective",
            Mood::Humorous => "humorous",
        }
    }
}

/// Language a post is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Vi,
    En,
}

impl ClosedSet for Language {
    const ALL: &'static [Self] = &[Language::Vi, Language::En];

    fn as_str(&self) -> &'static str {
        match self {
            Language::Vi => "vi",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved image asset (hero images)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    /// Path relative to the site root, always with `/` separators
    pub src: String,
    pub width: u32,
    pub height: u32,
    /// Lower-case file extension of the detected format (`png`, `jpg`, ...)
    pub format: String,
}

/// Search-engine overrides for a single post
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Seo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    #[serde(rename = "canonicalURL", skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<Url>,
    pub noindex: bool,
}

/// A validated, normalized blog post.
///
/// Only produced by the validator; serializes back to the same front-matter
/// field names it was read from, so a serialized post validates to itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub title: String,
    pub description: String,
    pub pub_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<DateTime<Utc>>,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<ImageAsset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_image_alt: Option<String>,
    pub category: Category,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_order: Option<f64>,
    pub draft: bool,
    pub featured: bool,
    pub language: Language,
    pub reading_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo: Option<Seo>,
    pub category_slug: String,
}

impl Post {
    /// Whether search engines may index this post
    pub fn is_indexable(&self) -> bool {
        !self.draft && !self.seo.as_ref().is_some_and(|seo| seo.noindex)
    }

    /// Date of the last change, falling back to the publication date
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.updated_date.unwrap_or(self.pub_date)
    }
}

/// A post together with where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct PostEntry {
    /// Content-source slug, stable across edits to the front matter
    pub id: String,
    pub post: Post,
    /// Markup body following the front matter
    pub body: String,
    pub source: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_set_parse() {
        assert_eq!(Category::parse("life"), Some(Category::Life));
        assert_eq!(Category::parse("cooking"), None);
        assert_eq!(Category::parse("Life"), None);
        assert_eq!(Mood::parse("humorous"), Some(Mood::Humorous));
        assert_eq!(Language::parse("en"), Some(Language::En));
    }

    #[test]
    fn test_closed_set_defaults() {
        assert_eq!(Category::default(), Category::Notes);
        assert_eq!(Language::default(), Language::Vi);
    }

    #[test]
    fn test_allowed_lists_every_variant() {
        assert_eq!(
            Category::allowed(),
            vec!["engineering", "life", "notes", "projects"]
        );
        assert_eq!(Language::allowed(), vec!["vi", "en"]);
    }

    #[test]
    fn test_display_matches_serialized_name() {
        for category in Category::ALL {
            let json = serde_json::to_value(category).unwrap();
            assert_eq!(json, serde_json::Value::String(category.to_string()));
        }
    }
}
