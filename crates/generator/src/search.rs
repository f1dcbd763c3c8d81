//! Full-text search index for client-side search.

use blog_kit_core::config::SiteConfig;
use blog_kit_core::text::plain_text;
use blog_kit_core::{Category, Language, PostEntry};
use serde::Serialize;

pub const SEARCH_INDEX: &str = "search-index.json";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRecord {
    pub id: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub tags: Vec<String>,
    pub language: Language,
    pub content: String,
}

/// One record per indexable post, newest first
pub fn build_search_index(posts: &[PostEntry], site: &SiteConfig) -> Vec<SearchRecord> {
    let mut indexable: Vec<&PostEntry> = posts.iter().filter(|e| e.post.is_indexable()).collect();
    indexable.sort_by(|a, b| b.post.pub_date.cmp(&a.post.pub_date));

    indexable
        .into_iter()
        .map(|entry| SearchRecord {
            id: entry.id.clone(),
            url: site.feed.item_link(&entry.id),
            title: entry.post.title.clone(),
            description: entry.post.description.clone(),
            category: entry.post.category,
            tags: entry.post.tags.clone(),
            language: entry.post.language,
            content: plain_text(&entry.body),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{entry, site_config};

    #[test]
    fn test_index_records() {
        let mut post = entry("hello-world", "2024-01-01", false);
        post.body = "# Hi\n\nThis is **Compose**.\n".to_string();
        post.post.tags = vec!["android".to_string()];
        let posts = vec![post, entry("draft", "2024-02-01", true)];

        let index = build_search_index(&posts, &site_config());
        assert_eq!(index.len(), 1);
        assert_eq!(index[0].url, "/blog/hello-world");
        assert_eq!(index[0].content, "Hi This is Compose.");

        let json = serde_json::to_value(&index).unwrap();
        assert_eq!(json[0]["category"], "notes");
        assert_eq!(json[0]["language"], "vi");
        assert_eq!(json[0]["tags"][0], "android");
    }
}
