use blog_kit_core::text::word_count;

/// Estimate reading time from a markdown body, e.g. `"3 min read"`.
/// Never reports less than one minute.
pub fn estimate(body: &str, words_per_minute: u32) -> String {
    let words = word_count(body);
    let per_minute = words_per_minute.max(1) as usize;
    let minutes = words.div_ceil(per_minute).max(1);
    format!("{} min read", minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_rounds_up() {
        let body = "word ".repeat(201);
        assert_eq!(estimate(&body, 200), "2 min read");

        let body = "word ".repeat(200);
        assert_eq!(estimate(&body, 200), "1 min read");
    }

    #[test]
    fn test_estimate_minimum_one_minute() {
        assert_eq!(estimate("", 200), "1 min read");
        assert_eq!(estimate("short", 200), "1 min read");
    }

    #[test]
    fn test_estimate_ignores_markup() {
        let body = "# Title\n\n[link](https://example.com/a/very/long/url) **bold**\n";
        // "Title link bold"
        assert_eq!(estimate(body, 3), "1 min read");
        assert_eq!(estimate(body, 2), "2 min read");
    }
}
