//! Syndication outputs derived from validated posts: the RSS feed, the
//! sitemap and the search index.

pub mod feed;
pub mod search;
pub mod sitemap;
pub mod xml;

pub use feed::{FeedDocument, FeedItem, build_feed};
pub use search::{SearchRecord, build_search_index};
pub use sitemap::build_sitemap;

use blog_kit_core::PostEntry;
use blog_kit_core::config::SiteConfig;

pub struct GeneratedSite {
    pub pages: Vec<(String, String)>, // (path, contents)
}

/// Generate every enabled output for the given posts
pub fn generate_site(posts: &[PostEntry], site: &SiteConfig) -> anyhow::Result<GeneratedSite> {
    let mut pages = Vec::new();

    if site.feed.enabled {
        let feed = build_feed(posts, site);
        tracing::debug!(items = feed.items.len(), "built feed");
        pages.push((output_path(&site.feed.path), feed.to_xml()));
    }

    if site.integrations.sitemap {
        pages.extend(build_sitemap(posts, site));
    }

    if site.integrations.search_index {
        let index = build_search_index(posts, site);
        tracing::debug!(records = index.len(), "built search index");
        pages.push((
            search::SEARCH_INDEX.to_string(),
            serde_json::to_string(&index)?,
        ));
    }

    Ok(GeneratedSite { pages })
}

/// Output path with `/` separators
fn output_path(path: &std::path::Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
pub(crate) mod test_support {
    use blog_kit_core::config::{SiteConfig, parse_site_toml_str};
    use blog_kit_core::{Category, Language, Post, PostEntry};
    use chrono::NaiveDate;
    use std::path::PathBuf;

    pub fn site_config() -> SiteConfig {
        parse_site_toml_str(
            r##"
[site]
origin = "https://khoivan.dev"
title = "Khoi Van - Android Developer Blog"
description = "Technical articles about Android development, Clean Architecture, Jetpack Compose, and more."
"##,
        )
        .unwrap()
    }

    /// A published or draft post with the given id and `YYYY-MM-DD` date
    pub fn entry(id: &str, date: &str, draft: bool) -> PostEntry {
        let pub_date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc();

        PostEntry {
            id: id.to_string(),
            post: Post {
                title: format!("Post {}", id),
                description: format!("About {}", id),
                pub_date,
                updated_date: None,
                author: "Khoi Van".to_string(),
                hero_image: None,
                hero_image_alt: None,
                category: Category::Notes,
                tags: vec![],
                mood: None,
                series: None,
                series_order: None,
                draft,
                featured: false,
                language: Language::Vi,
                reading_time: "5 min read".to_string(),
                seo: None,
                category_slug: "notes".to_string(),
            },
            body: String::new(),
            source: PathBuf::from(format!("src/content/blog/{}.md", id)),
        }
    }
}
