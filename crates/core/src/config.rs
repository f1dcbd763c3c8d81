use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Name of the site configuration file at the root of a site directory
pub const SITE_CONFIG_FILE: &str = "site.toml";

/// Validated site configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    pub site: SiteMetadata,
    pub content: ContentConfig,
    pub feed: FeedConfig,
    pub integrations: Integrations,
    pub build: BuildConfig,
}

/// Identity of the site, used as the feed channel
#[derive(Debug, Clone, PartialEq)]
pub struct SiteMetadata {
    /// Canonical origin; every absolute link is resolved against it
    pub origin: Url,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentConfig {
    /// Directory holding the blog collection, relative to the site root
    pub dir: PathBuf,
    /// Estimate reading time from the body when the front matter has none
    pub compute_reading_time: bool,
    pub words_per_minute: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    pub enabled: bool,
    /// Output path of the feed document, relative to the output directory
    pub path: PathBuf,
    pub link_prefix: String,
    pub language: String,
    pub stylesheet: Option<String>,
}

impl FeedConfig {
    /// Site-relative link for a post id
    pub fn item_link(&self, id: &str) -> String {
        format!("{}/{}", self.link_prefix.trim_end_matches('/'), id)
    }
}

/// Optional outputs and source formats
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Integrations {
    pub sitemap: bool,
    pub search_index: bool,
    /// Accept `.mdx` sources in addition to `.md`
    pub mdx: bool,
}

impl Default for Integrations {
    fn default() -> Self {
        Self {
            sitemap: true,
            search_index: true,
            mdx: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfig {
    /// Static files copied verbatim into the output (stylesheets, images)
    pub public_dir: PathBuf,
}

/// Raw TOML configuration structure
/// This matches the site.toml file structure exactly
#[derive(Debug, Deserialize)]
struct RawConfig {
    site: RawSite,
    #[serde(default)]
    content: RawContent,
    #[serde(default)]
    feed: RawFeed,
    #[serde(default)]
    integrations: Integrations,
    #[serde(default)]
    build: RawBuild,
}

#[derive(Debug, Deserialize)]
struct RawSite {
    origin: String, // Parse as Url
    title: String,
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawContent {
    dir: String, // Convert to PathBuf
    compute_reading_time: bool,
    words_per_minute: u32,
}

impl Default for RawContent {
    fn default() -> Self {
        Self {
            dir: "src/content/blog".to_string(),
            compute_reading_time: false,
            words_per_minute: 200,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawFeed {
    enabled: bool,
    path: String,
    link_prefix: String,
    language: String,
    stylesheet: Option<String>,
}

impl Default for RawFeed {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "rss.xml".to_string(),
            link_prefix: "/blog/".to_string(),
            language: "vi-vn".to_string(),
            stylesheet: Some("/rss-styles.xsl".to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawBuild {
    public_dir: String,
}

impl Default for RawBuild {
    fn default() -> Self {
        Self {
            public_dir: "public".to_string(),
        }
    }
}

/// Parse site.toml from a file path
pub fn parse_site_toml<P: AsRef<Path>>(path: P) -> Result<SiteConfig> {
    let content = fs::read_to_string(path)?;
    parse_site_toml_str(&content)
}

/// Parse site.toml from a string (useful for testing)
pub fn parse_site_toml_str(content: &str) -> Result<SiteConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    let origin = parse_origin(&raw.site.origin)?;

    if raw.content.words_per_minute == 0 {
        return Err(Error::ConfigParse(
            "content.words_per_minute must be greater than zero".to_string(),
        ));
    }

    if !raw.feed.link_prefix.starts_with('/') {
        return Err(Error::ConfigParse(format!(
            "feed.link_prefix must start with '/': '{}'",
            raw.feed.link_prefix
        )));
    }

    let content = ContentConfig {
        dir: validate_path(&raw.content.dir, "content.dir")?,
        compute_reading_time: raw.content.compute_reading_time,
        words_per_minute: raw.content.words_per_minute,
    };

    let feed = FeedConfig {
        enabled: raw.feed.enabled,
        path: validate_path(&raw.feed.path, "feed.path")?,
        link_prefix: raw.feed.link_prefix,
        language: raw.feed.language,
        stylesheet: raw.feed.stylesheet.filter(|s| !s.trim().is_empty()),
    };

    let build = BuildConfig {
        public_dir: validate_path(&raw.build.public_dir, "build.public_dir")?,
    };

    Ok(SiteConfig {
        site: SiteMetadata {
            origin,
            title: raw.site.title,
            description: raw.site.description,
        },
        content,
        feed,
        integrations: raw.integrations,
        build,
    })
}

/// Parse the site origin; it must be an absolute http(s) URL with a host
fn parse_origin(origin: &str) -> Result<Url> {
    let url = Url::parse(origin)
        .map_err(|e| Error::ConfigParse(format!("Invalid site.origin '{}': {}", origin, e)))?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(Error::ConfigParse(format!(
            "site.origin must be an http(s) URL with a host: '{}'",
            origin
        )));
    }

    Ok(url)
}

/// Validate and convert a path string to PathBuf.
///
/// Rejects absolute paths and parent directory references (`..`) so that a
/// site.toml cannot point the build at files outside the site directory.
///
/// ```text
/// validate_path("src/content/blog", "content.dir")  → Ok(PathBuf)
/// validate_path("/etc", "content.dir")              → Err("Absolute paths not allowed...")
/// validate_path("../other-site", "content.dir")     → Err("Parent directory references...")
/// ```
pub fn validate_path(path_str: &str, field_name: &str) -> Result<PathBuf> {
    let path = Path::new(path_str);

    // Reject absolute paths
    if path.is_absolute() {
        return Err(Error::ConfigParse(format!(
            "Absolute paths not allowed in '{}': '{}'. Use relative paths only.",
            field_name, path_str
        )));
    }

    // Check for parent directory references
    for component in path.components() {
        if component == std::path::Component::ParentDir {
            return Err(Error::ConfigParse(format!(
                "Parent directory references (..) not allowed in '{}': '{}'",
                field_name, path_str
            )));
        }
    }

    // Ensure path is not empty
    if path_str.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty path in '{}' field",
            field_name
        )));
    }

    Ok(path.to_path_buf())
}
