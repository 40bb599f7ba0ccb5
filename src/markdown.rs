//! Markdown-to-HTML conversion for article bodies.
//!
//! The pipeline stores bodies as raw Markdown and only renders on demand,
//! for the single article a caller asks for with its body. The extension set
//! is fixed site-wide; anything fancier (link rewriting, syntax
//! highlighting, image CDNs) happens downstream.

use pulldown_cmark::{html, Options, Parser};

/// Converts an article body to HTML.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut out = String::new();
    html::push_html(&mut out, Parser::new_ext(markdown, options));
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_paragraph() {
        assert_eq!(to_html("Hello, world"), "<p>Hello, world</p>\n");
    }

    #[test]
    fn test_tables_enabled() {
        let html = to_html("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_strikethrough_enabled() {
        assert!(to_html("~~gone~~").contains("<del>"));
    }

    #[test]
    fn test_task_lists_enabled() {
        let html = to_html("- [x] soak the oats\n- [ ] bake\n");
        assert!(html.contains("checkbox"));
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(to_html(""), "");
    }
}
