//! Shape checks and defaults for raw post front matter.
//!
//! [`validate`] looks at every field and collects all problems before
//! returning, so one run reports everything wrong with a file.

use crate::image::ImageResolver;
use blog_kit_core::types::{
    Category, ClosedSet, DEFAULT_AUTHOR, ImageAsset, Language, Mood, RawRecord, Seo,
};
use blog_kit_core::{FieldIssue, IssueKind, ValidationError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use url::Url;

pub const TITLE_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 200;
pub const SEO_TITLE_MAX: usize = 60;
pub const SEO_DESCRIPTION_MAX: usize = 160;

/// Keys the schema understands. `categorySlug` is accepted but ignored and
/// `slug` is consumed by the collection loader.
pub const KNOWN_FIELDS: &[&str] = &[
    "title",
    "description",
    "pubDate",
    "updatedDate",
    "author",
    "heroImage",
    "heroImageAlt",
    "category",
    "tags",
    "mood",
    "series",
    "seriesOrder",
    "draft",
    "featured",
    "language",
    "readingTime",
    "seo",
    "categorySlug",
    "slug",
];

const SEO_FIELDS: &[&str] = &["title", "description", "ogImage", "canonicalURL", "noindex"];

/// Front matter that passed validation, with defaults applied but nothing
/// derived yet
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    pub title: String,
    pub description: String,
    pub pub_date: DateTime<Utc>,
    pub updated_date: Option<DateTime<Utc>>,
    pub author: String,
    pub hero_image: Option<ImageAsset>,
    pub hero_image_alt: Option<String>,
    pub category: Category,
    pub tags: Vec<String>,
    pub mood: Option<Mood>,
    pub series: Option<String>,
    pub series_order: Option<f64>,
    pub draft: bool,
    pub featured: bool,
    pub language: Language,
    pub reading_time: Option<String>,
    pub seo: Option<Seo>,
}

/// Check a raw record against the post schema
pub fn validate(
    raw: &RawRecord,
    images: &dyn ImageResolver,
) -> Result<FrontMatter, ValidationError> {
    let mut issues = Vec::new();

    let title = required_string(raw, "title", "title", Some(TITLE_MAX), &mut issues)
        .and_then(|t| not_blank(t, "title", &mut issues));
    let description = required_string(
        raw,
        "description",
        "description",
        Some(DESCRIPTION_MAX),
        &mut issues,
    );
    let pub_date = required_date(raw, "pubDate", &mut issues);
    let updated_date = field(raw, "updatedDate").and_then(|v| date(v, "updatedDate", &mut issues));
    let author = optional_string(raw, "author", "author", None, &mut issues);

    let hero_image =
        field(raw, "heroImage").and_then(|v| hero_image(v, "heroImage", images, &mut issues));
    let hero_image_alt = optional_string(raw, "heroImageAlt", "heroImageAlt", None, &mut issues);

    let category = field(raw, "category").and_then(|v| closed_set::<Category>(v, "category", &mut issues));
    let tags = field(raw, "tags").and_then(|v| string_list(v, "tags", &mut issues));
    let mood = field(raw, "mood").and_then(|v| closed_set::<Mood>(v, "mood", &mut issues));

    let series = optional_string(raw, "series", "series", None, &mut issues);
    let series_order = field(raw, "seriesOrder").and_then(|v| number(v, "seriesOrder", &mut issues));

    let draft = field(raw, "draft").and_then(|v| boolean(v, "draft", &mut issues));
    let featured = field(raw, "featured").and_then(|v| boolean(v, "featured", &mut issues));
    let language =
        field(raw, "language").and_then(|v| closed_set::<Language>(v, "language", &mut issues));
    let reading_time = optional_string(raw, "readingTime", "readingTime", None, &mut issues);

    let seo = field(raw, "seo").and_then(|v| seo(v, &mut issues));

    let (Some(title), Some(description), Some(pub_date)) = (title, description, pub_date) else {
        return Err(ValidationError { issues });
    };
    if !issues.is_empty() {
        return Err(ValidationError { issues });
    }

    Ok(FrontMatter {
        title,
        description,
        pub_date,
        updated_date,
        author: author.unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
        hero_image,
        hero_image_alt,
        category: category.unwrap_or_default(),
        tags: tags.unwrap_or_default(),
        mood,
        series,
        series_order,
        draft: draft.unwrap_or(false),
        featured: featured.unwrap_or(false),
        language: language.unwrap_or_default(),
        reading_time,
        seo,
    })
}

/// Top-level keys the schema does not know about
pub fn unknown_fields(raw: &RawRecord) -> Vec<String> {
    let mut unknown: Vec<String> = raw
        .keys()
        .filter(|key| !KNOWN_FIELDS.contains(&key.as_str()))
        .cloned()
        .collect();

    if let Some(Value::Object(seo)) = raw.get("seo") {
        unknown.extend(
            seo.keys()
                .filter(|key| !SEO_FIELDS.contains(&key.as_str()))
                .map(|key| format!("seo.{}", key)),
        );
    }

    unknown
}

/// A present, non-null value. YAML `key:` with nothing after it counts as absent.
fn field<'a>(raw: &'a RawRecord, key: &str) -> Option<&'a Value> {
    raw.get(key).filter(|v| !v.is_null())
}

fn required_string(
    raw: &RawRecord,
    key: &str,
    path: &str,
    max: Option<usize>,
    issues: &mut Vec<FieldIssue>,
) -> Option<String> {
    match field(raw, key) {
        Some(value) => string(value, path, max, issues),
        None => {
            issues.push(FieldIssue::new(path, IssueKind::Missing));
            None
        }
    }
}

fn optional_string(
    raw: &RawRecord,
    key: &str,
    path: &str,
    max: Option<usize>,
    issues: &mut Vec<FieldIssue>,
) -> Option<String> {
    field(raw, key).and_then(|value| string(value, path, max, issues))
}

fn string(
    value: &Value,
    path: &str,
    max: Option<usize>,
    issues: &mut Vec<FieldIssue>,
) -> Option<String> {
    let Some(s) = value.as_str() else {
        issues.push(FieldIssue::new(path, IssueKind::WrongType { expected: "string" }));
        return None;
    };

    if let Some(max) = max {
        let actual = s.chars().count();
        if actual > max {
            issues.push(FieldIssue::new(path, IssueKind::TooLong { max, actual }));
            return None;
        }
    }

    Some(s.to_string())
}

/// A blank value counts as missing
fn not_blank(value: String, path: &str, issues: &mut Vec<FieldIssue>) -> Option<String> {
    if value.trim().is_empty() {
        issues.push(FieldIssue::new(path, IssueKind::Missing));
        return None;
    }
    Some(value)
}

fn boolean(value: &Value, path: &str, issues: &mut Vec<FieldIssue>) -> Option<bool> {
    let b = value.as_bool();
    if b.is_none() {
        issues.push(FieldIssue::new(path, IssueKind::WrongType { expected: "boolean" }));
    }
    b
}

fn number(value: &Value, path: &str, issues: &mut Vec<FieldIssue>) -> Option<f64> {
    let n = value.as_f64();
    if n.is_none() {
        issues.push(FieldIssue::new(path, IssueKind::WrongType { expected: "number" }));
    }
    n
}

fn string_list(value: &Value, path: &str, issues: &mut Vec<FieldIssue>) -> Option<Vec<String>> {
    let Some(items) = value.as_array() else {
        issues.push(FieldIssue::new(
            path,
            IssueKind::WrongType {
                expected: "list of strings",
            },
        ));
        return None;
    };

    let mut out = Vec::with_capacity(items.len());
    let mut ok = true;
    for (i, item) in items.iter().enumerate() {
        match item.as_str() {
            Some(s) => out.push(s.to_string()),
            None => {
                ok = false;
                issues.push(FieldIssue::new(
                    format!("{}[{}]", path, i),
                    IssueKind::WrongType { expected: "string" },
                ));
            }
        }
    }

    ok.then_some(out)
}

fn closed_set<T: ClosedSet>(value: &Value, path: &str, issues: &mut Vec<FieldIssue>) -> Option<T> {
    let s = string(value, path, None, issues)?;
    let parsed = T::parse(&s);
    if parsed.is_none() {
        issues.push(FieldIssue::new(
            path,
            IssueKind::NotInEnum {
                found: s,
                allowed: T::allowed(),
            },
        ));
    }
    parsed
}

fn required_date(
    raw: &RawRecord,
    key: &str,
    issues: &mut Vec<FieldIssue>,
) -> Option<DateTime<Utc>> {
    match field(raw, key) {
        Some(value) => date(value, key, issues),
        None => {
            issues.push(FieldIssue::new(key, IssueKind::Missing));
            None
        }
    }
}

fn date(value: &Value, path: &str, issues: &mut Vec<FieldIssue>) -> Option<DateTime<Utc>> {
    match coerce_date(value) {
        Ok(date) => Some(date),
        Err(kind) => {
            issues.push(FieldIssue::new(path, kind));
            None
        }
    }
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Coerce a raw value into a UTC timestamp.
///
/// Strings may be RFC 3339, RFC 2822, a bare `YYYY-MM-DD` date (midnight UTC)
/// or a date-time without offset (taken as UTC). Numbers are milliseconds
/// since the Unix epoch.
pub fn coerce_date(value: &Value) -> Result<DateTime<Utc>, IssueKind> {
    match value {
        Value::String(s) => parse_date_str(s.trim()).ok_or_else(|| IssueKind::InvalidDate(s.clone())),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .ok_or_else(|| IssueKind::InvalidDate(n.to_string())),
        _ => Err(IssueKind::WrongType { expected: "date" }),
    }
}

fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(|naive| naive.and_utc())
}

fn hero_image(
    value: &Value,
    path: &str,
    images: &dyn ImageResolver,
    issues: &mut Vec<FieldIssue>,
) -> Option<ImageAsset> {
    match value {
        Value::String(src) => match images.resolve(src) {
            Ok(asset) => Some(asset),
            Err(err) => {
                issues.push(FieldIssue::new(path, IssueKind::Image(err.to_string())));
                None
            }
        },
        // Already-resolved asset, e.g. a normalized post fed back in. The file
        // is resolved again and must still match what was recorded.
        Value::Object(map) => {
            let src = match map.get("src") {
                Some(v) => string(v, &format!("{}.src", path), None, issues),
                None => {
                    issues.push(FieldIssue::new(format!("{}.src", path), IssueKind::Missing));
                    None
                }
            };
            let width = dimension(map.get("width"), &format!("{}.width", path), issues);
            let height = dimension(map.get("height"), &format!("{}.height", path), issues);
            let format = match map.get("format") {
                Some(v) => string(v, &format!("{}.format", path), None, issues),
                None => {
                    issues.push(FieldIssue::new(format!("{}.format", path), IssueKind::Missing));
                    None
                }
            };

            let recorded = ImageAsset {
                src: src?,
                width: width?,
                height: height?,
                format: format?,
            };

            let from_root = format!("/{}", recorded.src.trim_start_matches('/'));
            match images.resolve(&from_root) {
                Ok(actual)
                    if actual.width == recorded.width
                        && actual.height == recorded.height
                        && actual.format == recorded.format =>
                {
                    Some(actual)
                }
                Ok(actual) => {
                    issues.push(FieldIssue::new(
                        path,
                        IssueKind::Image(format!(
                            "'{}' is recorded as {}x{} {} but the file is {}x{} {}",
                            recorded.src,
                            recorded.width,
                            recorded.height,
                            recorded.format,
                            actual.width,
                            actual.height,
                            actual.format
                        )),
                    ));
                    None
                }
                Err(err) => {
                    issues.push(FieldIssue::new(path, IssueKind::Image(err.to_string())));
                    None
                }
            }
        }
        _ => {
            issues.push(FieldIssue::new(
                path,
                IssueKind::WrongType {
                    expected: "image path",
                },
            ));
            None
        }
    }
}

fn dimension(value: Option<&Value>, path: &str, issues: &mut Vec<FieldIssue>) -> Option<u32> {
    let Some(value) = value else {
        issues.push(FieldIssue::new(path, IssueKind::Missing));
        return None;
    };

    let dim = value.as_u64().and_then(|n| u32::try_from(n).ok());
    if dim.is_none() {
        issues.push(FieldIssue::new(
            path,
            IssueKind::WrongType {
                expected: "pixel count",
            },
        ));
    }
    dim
}

fn seo(value: &Value, issues: &mut Vec<FieldIssue>) -> Option<Seo> {
    let Some(map) = value.as_object() else {
        issues.push(FieldIssue::new("seo", IssueKind::WrongType { expected: "mapping" }));
        return None;
    };

    let before = issues.len();

    let title = optional_string(map, "title", "seo.title", Some(SEO_TITLE_MAX), issues);
    let description = optional_string(
        map,
        "description",
        "seo.description",
        Some(SEO_DESCRIPTION_MAX),
        issues,
    );
    let og_image = optional_string(map, "ogImage", "seo.ogImage", None, issues);
    let canonical_url = optional_string(map, "canonicalURL", "seo.canonicalURL", None, issues)
        .and_then(|s| match Url::parse(&s) {
            Ok(url) => Some(url),
            Err(_) => {
                issues.push(FieldIssue::new("seo.canonicalURL", IssueKind::MalformedUrl(s)));
                None
            }
        });
    let noindex = field(map, "noindex").and_then(|v| boolean(v, "seo.noindex", issues));

    if issues.len() > before {
        return None;
    }

    Some(Seo {
        title,
        description,
        og_image,
        canonical_url,
        noindex: noindex.unwrap_or(false),
    })
}
