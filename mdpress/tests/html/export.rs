//! Export tests for the HTML and Word formats (Markdown → HTML)

use crate::common::{child_element_names, find_all, find_by_class, parse_html, text_content};
use insta::assert_snapshot;
use mdpress::format::Format;
use mdpress::formats::common::blocks_to_html_body;
use mdpress::formats::html::{HtmlFormat, HtmlTheme};
use mdpress::formats::word::WordFormat;
use mdpress::parse_blocks;
use mdpress::parse_document;

fn md_to_html(source: &str, theme: HtmlTheme) -> String {
    HtmlFormat::new(theme)
        .serialize(&parse_document(source))
        .unwrap()
}

fn body(source: &str) -> String {
    blocks_to_html_body(&parse_blocks(source))
}

// ============================================================================
// BODY FRAGMENTS
// ============================================================================

#[test]
fn test_mixed_document_body() {
    let source = "# Notes & Ideas\n\nPlain *italic* and `code`.\n\n1. one\n2. two\n- bullet\n\n> **quoted**\n\n---\n\n```rust\nif a < b {}\n```";
    assert_snapshot!(body(source), @r#"
    <h1>Notes &amp; Ideas</h1>
    <p>Plain <em>italic</em> and <code>code</code>.</p>
    <ol>
    <li>one</li>
    <li>two</li>
    </ol>
    <ul>
    <li>bullet</li>
    </ul>
    <blockquote><strong>quoted</strong></blockquote>
    <hr>
    <pre><code>if a &lt; b {}</code></pre>
    "#);
}

#[test]
fn test_headings_drop_inline_styling() {
    assert_snapshot!(body("## A **bold** heading"), @"<h2>A bold heading</h2>");
}

#[test]
fn test_nested_emphasis() {
    assert_snapshot!(
        body("***both*** and **bold *inner***"),
        @"<p><strong><em>both</em></strong> and <strong>bold </strong><strong><em>inner</em></strong></p>"
    );
}

#[test]
fn test_fallback_line_is_escaped_literal() {
    assert_snapshot!(body("- - <b>"), @"<ul>\n<li>- &lt;b&gt;</li>\n</ul>");
}

// ============================================================================
// DOCUMENT STRUCTURE
// ============================================================================

#[test]
fn test_alternating_lists_are_separate() {
    let html = md_to_html("- a\n1. b\n- c", HtmlTheme::Light);
    let dom = parse_html(&html);
    let article = find_by_class(&dom.document, "markdown-body").unwrap();

    assert_eq!(child_element_names(&article), vec!["ul", "ol", "ul"]);
    assert_eq!(find_all(&dom.document, "li").len(), 3);
}

#[test]
fn test_code_block_content_survives_parsing() {
    let html = md_to_html("```\n<script>alert('x')</script>\n  indented\n```", HtmlTheme::Light);
    let dom = parse_html(&html);

    assert!(find_all(&dom.document, "script").is_empty());
    let code = find_all(&dom.document, "code");
    assert_eq!(code.len(), 1);
    assert_eq!(
        text_content(&code[0]),
        "<script>alert('x')</script>\n  indented"
    );
}

#[test]
fn test_title_element() {
    let html = md_to_html("intro\n\n## Chapter <1>", HtmlTheme::Dark);
    let dom = parse_html(&html);
    let titles = find_all(&dom.document, "title");
    assert_eq!(text_content(&titles[0]), "Chapter <1>");
}

#[test]
fn test_render_is_deterministic() {
    let source = "# Same\n\n- a\n- b\n\n```\ncode\n```";
    assert_eq!(
        md_to_html(source, HtmlTheme::Light),
        md_to_html(source, HtmlTheme::Light)
    );
}

#[test]
fn test_word_export_parses_as_html() {
    let doc = parse_document("# Report\n\n- a\n- b");
    let word = WordFormat::default().serialize(&doc).unwrap();
    let dom = parse_html(&word);

    let section = find_by_class(&dom.document, "WordSection1").expect("word section");
    assert_eq!(child_element_names(&section), vec!["h1", "ul"]);
    assert_eq!(find_all(&section, "li").len(), 2);
}
