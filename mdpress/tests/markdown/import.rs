//! Import tests for Markdown (Markdown → blocks)

use mdpress::format::Format;
use mdpress::formats::markdown::MarkdownFormat;
use mdpress::{BlockKind, Document, RichTextRun};

fn parse(source: &str) -> Document {
    MarkdownFormat.parse(source).expect("markdown always parses")
}

fn summary(doc: &Document) -> Vec<(BlockKind, String)> {
    doc.iter()
        .map(|block| (block.kind.clone(), block.raw_content.clone()))
        .collect()
}

#[test]
fn test_kitchen_sink() {
    let source = "\
# Title
Intro paragraph

## Lists
- dash
* star
+ plus
10. ten
> quote

***
```sh
  $ make
```
####### seven";
    let doc = parse(source);

    assert_eq!(
        summary(&doc),
        vec![
            (BlockKind::Heading { level: 1 }, "Title".to_string()),
            (BlockKind::Paragraph, "Intro paragraph".to_string()),
            (BlockKind::Heading { level: 2 }, "Lists".to_string()),
            (BlockKind::UnorderedListItem, "dash".to_string()),
            (BlockKind::UnorderedListItem, "star".to_string()),
            (BlockKind::UnorderedListItem, "plus".to_string()),
            (BlockKind::OrderedListItem, "ten".to_string()),
            (BlockKind::Quote, "quote".to_string()),
            (BlockKind::HorizontalRule, String::new()),
            (
                BlockKind::CodeBlock {
                    language: "sh".to_string()
                },
                "  $ make".to_string()
            ),
            (BlockKind::Paragraph, "####### seven".to_string()),
        ]
    );
}

#[test]
fn test_source_lines_are_recorded() {
    let doc = parse("a\n\n```\nx\n```\nb");
    let lines: Vec<usize> = doc.iter().map(|block| block.source_line).collect();
    assert_eq!(lines, vec![0, 2, 5]);
}

#[test]
fn test_markers_need_a_space() {
    let doc = parse("-text\n#tag\n>quote\n1.5 apples");
    assert!(doc.iter().all(|block| block.kind == BlockKind::Paragraph));
}

#[test]
fn test_inline_runs() {
    let doc = parse("Mix of **bold**, *italic* and `code`");
    assert_eq!(
        doc.blocks[0].rich_content,
        vec![
            RichTextRun::plain("Mix of "),
            RichTextRun::plain("bold").bold(),
            RichTextRun::plain(", "),
            RichTextRun::plain("italic").italic(),
            RichTextRun::plain(" and "),
            RichTextRun::plain("code").code(),
        ]
    );
}

#[test]
fn test_unterminated_fence_is_dropped() {
    let doc = parse("before\n```\nlost line\nanother");
    assert_eq!(
        summary(&doc),
        vec![(BlockKind::Paragraph, "before".to_string())]
    );
}

#[test]
fn test_document_title() {
    assert_eq!(parse("text\n### Third").title(), Some("Third".to_string()));
    assert_eq!(parse("text").title(), None);
}

#[test]
fn test_blocks_serialize_to_json() {
    let doc = parse("## Hi");
    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(json["blocks"][0]["kind"]["type"], "heading");
    assert_eq!(json["blocks"][0]["kind"]["level"], 2);
    assert_eq!(json["blocks"][0]["rich_content"][0]["text"], "Hi");
}
