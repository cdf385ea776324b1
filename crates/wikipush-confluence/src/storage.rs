//! Markdown to Confluence storage format conversion.
//!
//! Storage format is XHTML-based; plain CommonMark HTML is close enough
//! for the REST API after a couple of fixups (self-closed breaks, no raw
//! checkbox inputs).

use pulldown_cmark::{Options, Parser, html};

use wikipush_sync::BodyRenderer;

/// Convert markdown to Confluence storage format.
#[must_use]
pub fn markdown_to_storage(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::new();
    html::push_html(&mut out, parser);

    // The API rejects HTML-style void tags and checkbox inputs
    out.replace("<br>", "<br/>")
        .replace(r#"<input disabled="" type="checkbox" checked=""/>"#, "")
        .replace(r#"<input disabled="" type="checkbox"/>"#, "")
}

/// [`BodyRenderer`] producing Confluence storage format.
pub struct StorageRenderer;

impl BodyRenderer for StorageRenderer {
    fn render_body(&self, markdown: &str) -> String {
        markdown_to_storage(markdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_and_paragraph() {
        let out = markdown_to_storage("# Title\n\nSome text.");
        assert!(out.contains("<h1>Title</h1>"));
        assert!(out.contains("<p>Some text.</p>"));
    }

    #[test]
    fn test_table_rendering() {
        let out = markdown_to_storage("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(out.contains("<table>"));
        assert!(out.contains("<td>1</td>"));
    }

    #[test]
    fn test_task_list_checkboxes_stripped() {
        let out = markdown_to_storage("- [ ] open\n- [x] done");
        assert!(!out.contains("<input"));
        assert!(out.contains("open"));
        assert!(out.contains("done"));
    }

    #[test]
    fn test_code_block_preserved() {
        let out = markdown_to_storage("```rust\nfn main() {}\n```");
        assert!(out.contains("<pre>"));
        assert!(out.contains("fn main() {}"));
    }

    #[test]
    fn test_renderer_trait_delegates() {
        let rendered = StorageRenderer.render_body("**bold**");
        assert!(rendered.contains("<strong>bold</strong>"));
    }
}
