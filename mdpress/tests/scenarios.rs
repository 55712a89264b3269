//! End-to-end scenarios: source text through parser and renderers.

use crate::common::{child_element_names, find_all, find_by_class, parse_html, text_content};
use mdpress::formats::html::{render_html, HtmlOptions};
use mdpress::formats::pdf::{paginate, FontSet, PageSetup, EMPTY_DOCUMENT_TEXT};
use mdpress::formats::text::render_plain_text;
use mdpress::formats::word::{render_word_html, WordOptions};
use mdpress::history::{HistoryStore, MemoryStore};
use mdpress::{markdown_to_pdf, markdown_to_text, parse_blocks, BlockKind};

#[test]
fn heading_and_bold_paragraph() {
    let blocks = parse_blocks("# Title\n\nSome **bold** text.");

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].kind, BlockKind::Heading { level: 1 });
    assert_eq!(blocks[0].raw_content, "Title");
    assert_eq!(blocks[1].kind, BlockKind::Paragraph);
    assert_eq!(blocks[1].raw_content, "Some **bold** text.");
    assert!(blocks[1].rich_content.iter().any(|run| run.bold && run.text == "bold"));

    assert_eq!(render_plain_text(&blocks), "Title\nSome bold text.");
}

#[test]
fn fenced_code_with_language() {
    let blocks = parse_blocks("```py\nprint(1)\n```");

    assert_eq!(blocks.len(), 1);
    assert_eq!(
        blocks[0].kind,
        BlockKind::CodeBlock {
            language: "py".to_string()
        }
    );
    assert_eq!(blocks[0].raw_content, "print(1)");

    let html = render_html(&blocks, &HtmlOptions::default());
    assert!(html.contains("<pre><code>print(1)</code></pre>"));
}

#[test]
fn list_closes_before_paragraph() {
    let blocks = parse_blocks("- a\n- b\n\nc");
    let kinds: Vec<_> = blocks.iter().map(|b| b.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            BlockKind::UnorderedListItem,
            BlockKind::UnorderedListItem,
            BlockKind::Paragraph
        ]
    );

    let html = render_html(&blocks, &HtmlOptions::default());
    assert_eq!(html.matches("<ul>").count(), 1);
    assert_eq!(html.matches("</ul>").count(), 1);
    assert!(html.contains("</ul>\n<p>c</p>"));

    let dom = parse_html(&html);
    let article = find_by_class(&dom.document, "markdown-body").expect("article element");
    assert_eq!(child_element_names(&article), vec!["ul", "p"]);

    let lists = find_all(&dom.document, "ul");
    assert_eq!(lists.len(), 1);
    let items = find_all(&lists[0], "li");
    assert_eq!(
        items.iter().map(text_content).collect::<Vec<_>>(),
        vec!["a", "b"]
    );
}

#[test]
fn history_bound_drops_first_commit() {
    let mut history = HistoryStore::open(MemoryStore::new(), 50).unwrap();
    for n in 0..51 {
        history.commit(&format!("document {n}")).unwrap();
    }

    assert_eq!(history.len(), 50);
    assert!(history.items().iter().all(|item| item.content != "document 0"));
    assert_eq!(history.items()[0].content, "document 50");
    assert_eq!(history.items()[49].content, "document 1");
}

#[test]
fn empty_input_renders_everywhere() {
    let blocks = parse_blocks("");
    assert!(blocks.is_empty());

    let html = render_html(&blocks, &HtmlOptions::default());
    let dom = parse_html(&html);
    let article = find_by_class(&dom.document, "markdown-body").expect("article element");
    assert!(child_element_names(&article).is_empty());

    let pages = paginate(&blocks, &PageSetup::default(), FontSet::bundled().unwrap());
    assert_eq!(pages.len(), 1);
    assert_eq!(pages.pages[0].texts(), vec![EMPTY_DOCUMENT_TEXT]);

    let word = render_word_html(&blocks, &WordOptions::default());
    assert!(word.contains("<div class=\"WordSection1\">\n</div>"));

    assert_eq!(render_plain_text(&blocks), "");
    assert_eq!(markdown_to_text(""), "");
    assert!(markdown_to_pdf("", &PageSetup::default())
        .unwrap()
        .starts_with(b"%PDF-"));
}

#[test]
fn whitespace_only_input_is_empty() {
    assert!(parse_blocks("  \n\t\n   ").is_empty());
}
