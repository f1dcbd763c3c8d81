/// Escape text for XML element content and attribute values
///
/// Escapes: & < > " '
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // Control characters other than tab/newline/CR are not allowed in XML 1.0
            c if c.is_control() && !matches!(c, '\t' | '\n' | '\r') => {}
            _ => out.push(c),
        }
    }
    out
}

/// The XML declaration every generated document starts with
pub const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_basic_characters() {
        assert_eq!(escape("&"), "&amp;");
        assert_eq!(escape("<"), "&lt;");
        assert_eq!(escape(">"), "&gt;");
        assert_eq!(escape("\""), "&quot;");
        assert_eq!(escape("'"), "&apos;");
    }

    #[test]
    fn test_escape_markup_in_titles() {
        assert_eq!(
            escape("Why <Composable> beats XML & friends"),
            "Why &lt;Composable&gt; beats XML &amp; friends"
        );
        assert_eq!(
            escape("]]><script>alert(1)</script>"),
            "]]&gt;&lt;script&gt;alert(1)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_escape_drops_control_characters() {
        assert_eq!(escape("a\u{0}b\u{8}c\td\n"), "abc\td\n");
    }

    #[test]
    fn test_escape_unicode() {
        assert_eq!(escape("Đà Lạt 🌄"), "Đà Lạt 🌄");
        assert_eq!(escape(""), "");
    }
}
