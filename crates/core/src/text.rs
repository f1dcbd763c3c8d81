//! Plain-text views of markdown bodies, for word counts and search.

use pulldown_cmark::{Event, Parser, TagEnd};

/// Extract the readable text of a markdown document.
///
/// Markup, HTML and link targets are dropped; block boundaries become
/// single spaces.
pub fn plain_text(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());

    for event in Parser::new(markdown) {
        match event {
            Event::Text(text) | Event::Code(text) => {
                out.push_str(&text);
            }
            Event::SoftBreak | Event::HardBreak => out.push(' '),
            Event::End(TagEnd::Paragraph)
            | Event::End(TagEnd::Heading(_))
            | Event::End(TagEnd::Item)
            | Event::End(TagEnd::CodeBlock)
            | Event::End(TagEnd::TableCell) => out.push(' '),
            _ => {}
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Number of whitespace-separated words in the document's plain text
pub fn word_count(markdown: &str) -> usize {
    plain_text(markdown).split_whitespace().count()
}
