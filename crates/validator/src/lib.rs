//! Content schema validation for blog posts.
//!
//! Validation runs in two steps: [`schema::validate`] checks the raw front
//! matter and applies defaults, then [`normalize::normalize`] derives the
//! computed fields. [`validate_and_normalize`] runs both.

pub mod collection;
pub mod image;
pub mod normalize;
pub mod reading_time;
pub mod schema;

pub use collection::{Collection, EntryFailure, load_collection};
pub use crate::image::{FsImageResolver, ImageError, ImageResolver};

use blog_kit_core::{Post, RawRecord, ValidationError};

/// Summary of a collection check, printed by the CLI
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate raw front matter and produce a normalized post
pub fn validate_and_normalize(
    raw: &RawRecord,
    images: &dyn ImageResolver,
) -> Result<Post, ValidationError> {
    schema::validate(raw, images).map(normalize::normalize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_kit_core::types::{Category, ImageAsset, Language, READING_TIME_PLACEHOLDER};
    use blog_kit_core::IssueKind;
    use serde_json::{Value, json};

    /// Resolves every path to a fixed 800x600 png. Relative paths land under
    /// `src/assets`, a leading `/` is the site root.
    struct FixedImages;

    impl ImageResolver for FixedImages {
        fn resolve(&self, src: &str) -> Result<ImageAsset, ImageError> {
            let src = match src.strip_prefix('/') {
                Some(from_root) => from_root.to_string(),
                None => format!("src/assets/{}", src.trim_start_matches("./")),
            };
            Ok(ImageAsset {
                src,
                width: 800,
                height: 600,
                format: "png".to_string(),
            })
        }
    }

    struct NoImages;

    impl ImageResolver for NoImages {
        fn resolve(&self, src: &str) -> Result<ImageAsset, ImageError> {
            Err(ImageError::NotFound(src.to_string()))
        }
    }

    fn record(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        }
    }

    fn minimal() -> RawRecord {
        record(json!({
            "title": "Hello World",
            "description": "First post",
            "pubDate": "2024-01-01",
        }))
    }

    #[test]
    fn test_defaults_applied() {
        let post = validate_and_normalize(&minimal(), &FixedImages).unwrap();

        assert_eq!(post.author, "Khoi Van");
        assert_eq!(post.category, Category::Notes);
        assert!(post.tags.is_empty());
        assert!(!post.draft);
        assert!(!post.featured);
        assert_eq!(post.language, Language::Vi);
        assert_eq!(post.reading_time, READING_TIME_PLACEHOLDER);
        assert_eq!(post.category_slug, "notes");
        assert_eq!(post.mood, None);
        assert_eq!(post.seo, None);
    }

    #[test]
    fn test_category_slug_ignores_input() {
        let mut raw = minimal();
        raw.insert("category".into(), json!("engineering"));
        raw.insert("categorySlug".into(), json!("something-else"));

        let post = validate_and_normalize(&raw, &FixedImages).unwrap();
        assert_eq!(post.category_slug, "engineering");
    }

    #[test]
    fn test_alt_text_fallback_uses_title() {
        let mut raw = minimal();
        raw.insert("heroImage".into(), json!("./hero.png"));

        let post = validate_and_normalize(&raw, &FixedImages).unwrap();
        assert_eq!(post.hero_image.unwrap().src, "src/assets/hero.png");
        assert_eq!(post.hero_image_alt.as_deref(), Some("Hello World"));
    }

    #[test]
    fn test_alt_text_not_synthesized_without_image() {
        let post = validate_and_normalize(&minimal(), &FixedImages).unwrap();
        assert_eq!(post.hero_image, None);
        assert_eq!(post.hero_image_alt, None);
    }

    #[test]
    fn test_alt_text_never_empty_with_image() {
        let mut raw = minimal();
        raw.insert("title".into(), json!(""));
        raw.insert("heroImage".into(), json!("a.png"));

        let err = validate_and_normalize(&raw, &FixedImages).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].field, "title");
        assert_eq!(err.issues[0].kind, IssueKind::Missing);
    }

    #[test]
    fn test_resolved_hero_image_goes_through_resolver() {
        let mut raw = minimal();
        raw.insert(
            "heroImage".into(),
            json!({ "src": "/does/not/exist.png", "width": 1, "height": 1, "format": "png" }),
        );

        let err = validate_and_normalize(&raw, &NoImages).unwrap_err();
        assert!(err.has_issue("heroImage"));
    }

    #[test]
    fn test_rejects_unknown_category() {
        let mut raw = minimal();
        raw.insert("category".into(), json!("cooking"));

        let err = validate_and_normalize(&raw, &FixedImages).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].field, "category");
        assert!(matches!(err.issues[0].kind, IssueKind::NotInEnum { .. }));
    }

    #[test]
    fn test_rejects_missing_pub_date() {
        let mut raw = minimal();
        raw.remove("pubDate");

        let err = validate_and_normalize(&raw, &FixedImages).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].field, "pubDate");
        assert_eq!(err.issues[0].kind, IssueKind::Missing);
    }

    #[test]
    fn test_rejects_unknown_mood_and_language() {
        let mut raw = minimal();
        raw.insert("mood".into(), json!("angry"));
        raw.insert("language".into(), json!("fr"));

        let err = validate_and_normalize(&raw, &FixedImages).unwrap_err();
        assert!(err.has_issue("mood"));
        assert!(err.has_issue("language"));
    }

    #[test]
    fn test_normalized_post_revalidates_to_itself() {
        let raw = record(json!({
            "title": "Đi Đà Lạt",
            "description": "Ghi chép chuyến đi",
            "pubDate": "2024-03-01T08:30:00+07:00",
            "updatedDate": "2024-03-05",
            "heroImage": "./dalat.jpg",
            "category": "life",
            "tags": ["travel", "food"],
            "mood": "reflective",
            "series": "vietnam-trips",
            "seriesOrder": 2,
            "featured": true,
            "language": "vi",
            "seo": {
                "title": "Đà Lạt",
                "canonicalURL": "https://khoivan.dev/blog/dalat",
                "noindex": false
            }
        }));

        let first = validate_and_normalize(&raw, &FixedImages).unwrap();

        let Value::Object(serialized) = serde_json::to_value(&first).unwrap() else {
            panic!("post must serialize to an object");
        };
        let second = validate_and_normalize(&serialized, &FixedImages).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_minimal_post_revalidates_to_itself() {
        let first = validate_and_normalize(&minimal(), &FixedImages).unwrap();
        let Value::Object(serialized) = serde_json::to_value(&first).unwrap() else {
            panic!("post must serialize to an object");
        };
        assert_eq!(validate_and_normalize(&serialized, &FixedImages).unwrap(), first);
    }

    #[test]
    fn test_report_is_ok_without_errors() {
        let report = ValidationReport {
            errors: vec![],
            warnings: vec!["unknown field".to_string()],
            info: vec![],
        };
        assert!(report.is_ok());
    }
}
