//! Sitemap index plus numbered sitemap chunks.

use crate::xml::{self, escape};
use blog_kit_core::PostEntry;
use blog_kit_core::config::SiteConfig;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write;
use url::Url;

pub const SITEMAP_INDEX: &str = "sitemap-index.xml";

/// Maximum URLs per sitemap file
pub const ENTRY_LIMIT: usize = 45_000;

const NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapUrl {
    pub loc: Url,
    pub lastmod: Option<DateTime<Utc>>,
}

/// The site origin followed by every indexable post, newest first
pub fn sitemap_urls(posts: &[PostEntry], site: &SiteConfig) -> Vec<SitemapUrl> {
    let mut indexable: Vec<&PostEntry> = posts.iter().filter(|e| e.post.is_indexable()).collect();
    indexable.sort_by(|a, b| b.post.pub_date.cmp(&a.post.pub_date));

    let mut urls = vec![SitemapUrl {
        loc: site.site.origin.clone(),
        lastmod: None,
    }];

    for entry in indexable {
        match site.site.origin.join(&site.feed.item_link(&entry.id)) {
            Ok(loc) => urls.push(SitemapUrl {
                loc,
                lastmod: Some(entry.post.last_modified()),
            }),
            Err(err) => {
                tracing::warn!(id = %entry.id, error = %err, "post link is not a valid URL");
            }
        }
    }

    urls
}

/// Sitemap files as (path, contents): the index first, then each chunk
pub fn build_sitemap(posts: &[PostEntry], site: &SiteConfig) -> Vec<(String, String)> {
    build_sitemap_with_limit(posts, site, ENTRY_LIMIT)
}

pub fn build_sitemap_with_limit(
    posts: &[PostEntry],
    site: &SiteConfig,
    limit: usize,
) -> Vec<(String, String)> {
    let urls = sitemap_urls(posts, site);
    let chunks: Vec<&[SitemapUrl]> = urls.chunks(limit.max(1)).collect();

    let mut files = Vec::with_capacity(chunks.len() + 1);
    let mut index = String::new();
    index.push_str(xml::DECLARATION);
    let _ = write!(index, "\n<sitemapindex xmlns=\"{}\">\n", NAMESPACE);

    for (i, chunk) in chunks.iter().enumerate() {
        let name = format!("sitemap-{}.xml", i);
        let loc = site
            .site
            .origin
            .join(&name)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| name.clone());
        let _ = writeln!(index, "  <sitemap><loc>{}</loc></sitemap>", escape(&loc));
        files.push((name, urlset(chunk)));
    }
    index.push_str("</sitemapindex>\n");

    files.insert(0, (SITEMAP_INDEX.to_string(), index));
    files
}

fn urlset(urls: &[SitemapUrl]) -> String {
    let mut out = String::new();
    out.push_str(xml::DECLARATION);
    let _ = write!(out, "\n<urlset xmlns=\"{}\">\n", NAMESPACE);
    for url in urls {
        out.push_str("  <url>");
        let _ = write!(out, "<loc>{}</loc>", escape(url.loc.as_str()));
        if let Some(lastmod) = url.lastmod {
            let _ = write!(
                out,
                "<lastmod>{}</lastmod>",
                lastmod.to_rfc3339_opts(SecondsFormat::Secs, true)
            );
        }
        out.push_str("</url>\n");
    }
    out.push_str("</urlset>\n");
    out
}
