//! RSS feed derived from the published posts.

use crate::xml::{self, escape};
use blog_kit_core::config::SiteConfig;
use blog_kit_core::{ClosedSet, PostEntry};
use chrono::{DateTime, Utc};
use std::fmt::Write;
use url::Url;

/// One syndication entry
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub title: String,
    /// Site-relative link, derived from the entry id only
    pub link: String,
    pub pub_date: DateTime<Utc>,
    pub description: String,
    pub author: String,
    /// Category first, then the tags in their original order
    pub categories: Vec<String>,
}

/// A feed ready to be serialized
#[derive(Debug, Clone, PartialEq)]
pub struct FeedDocument {
    pub title: String,
    pub description: String,
    pub site: Url,
    pub items: Vec<FeedItem>,
    pub language: String,
    pub stylesheet: Option<String>,
}

/// Build the feed: drafts dropped, newest first, each post projected to an item.
///
/// The sort is stable, so posts sharing a publication date keep their input
/// order.
pub fn build_feed(posts: &[PostEntry], site: &SiteConfig) -> FeedDocument {
    let mut published: Vec<&PostEntry> = posts.iter().filter(|entry| !entry.post.draft).collect();
    published.sort_by(|a, b| b.post.pub_date.cmp(&a.post.pub_date));

    let items = published
        .into_iter()
        .map(|entry| FeedItem {
            title: entry.post.title.clone(),
            link: site.feed.item_link(&entry.id),
            pub_date: entry.post.pub_date,
            description: entry.post.description.clone(),
            author: entry.post.author.clone(),
            categories: std::iter::once(entry.post.category.as_str().to_string())
                .chain(entry.post.tags.iter().cloned())
                .collect(),
        })
        .collect();

    FeedDocument {
        title: site.site.title.clone(),
        description: site.site.description.clone(),
        site: site.site.origin.clone(),
        items,
        language: site.feed.language.clone(),
        stylesheet: site.feed.stylesheet.clone(),
    }
}

impl FeedDocument {
    /// Absolute URL of an item link
    pub fn absolute_link(&self, link: &str) -> String {
        self.site
            .join(link)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| link.to_string())
    }

    /// Serialize as an RSS 2.0 document
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        out.push_str(xml::DECLARATION);
        out.push('\n');

        if let Some(stylesheet) = &self.stylesheet {
            let _ = writeln!(
                out,
                r#"<?xml-stylesheet href="{}" type="text/xsl"?>"#,
                escape(stylesheet)
            );
        }

        out.push_str("<rss version=\"2.0\">\n<channel>\n");
        let _ = writeln!(out, "  <title>{}</title>", escape(&self.title));
        let _ = writeln!(out, "  <description>{}</description>", escape(&self.description));
        let _ = writeln!(out, "  <link>{}</link>", escape(self.site.as_str()));
        let _ = writeln!(out, "  <language>{}</language>", escape(&self.language));

        for item in &self.items {
            let link = escape(&self.absolute_link(&item.link));

            out.push_str("  <item>\n");
            let _ = writeln!(out, "    <title>{}</title>", escape(&item.title));
            let _ = writeln!(out, "    <link>{}</link>", link);
            let _ = writeln!(out, "    <guid isPermaLink=\"true\">{}</guid>", link);
            let _ = writeln!(
                out,
                "    <description>{}</description>",
                escape(&item.description)
            );
            let _ = writeln!(out, "    <pubDate>{}</pubDate>", item.pub_date.to_rfc2822());
            for category in &item.categories {
                let _ = writeln!(out, "    <category>{}</category>", escape(category));
            }
            let _ = writeln!(out, "    <author>{}</author>", escape(&item.author));
            out.push_str("  </item>\n");
        }

        out.push_str("</channel>\n</rss>\n");
        out
    }
}
