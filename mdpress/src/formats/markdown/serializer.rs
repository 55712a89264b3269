//! Markdown serialization (blocks → Markdown export)

use crate::model::{Block, BlockKind};

/// Serialize blocks back to Markdown source.
pub fn serialize_to_markdown(blocks: &[Block]) -> String {
    let mut out = String::new();
    let mut previous: Option<&BlockKind> = None;
    let mut ordinal = 0usize;

    for block in blocks {
        if let Some(prev) = previous {
            let same_list = prev.is_list_item() && *prev == block.kind;
            out.push_str(if same_list { "\n" } else { "\n\n" });
        }

        if block.kind == BlockKind::OrderedListItem {
            ordinal = match previous {
                Some(BlockKind::OrderedListItem) => ordinal + 1,
                _ => 1,
            };
        }

        match &block.kind {
            BlockKind::Heading { level } => {
                out.push_str(&"#".repeat(usize::from(*level)));
                out.push(' ');
                out.push_str(&block.raw_content);
            }
            BlockKind::Paragraph => out.push_str(&block.raw_content),
            BlockKind::UnorderedListItem => {
                out.push_str("- ");
                out.push_str(&block.raw_content);
            }
            BlockKind::OrderedListItem => {
                out.push_str(&format!("{ordinal}. {}", block.raw_content));
            }
            BlockKind::Quote => {
                out.push_str("> ");
                out.push_str(&block.raw_content);
            }
            BlockKind::CodeBlock { language } => {
                out.push_str(&format!("```{language}\n{}\n```", block.raw_content));
            }
            BlockKind::HorizontalRule => out.push_str("---"),
        }

        previous = Some(&block.kind);
    }

    if !out.is_empty() {
        out.push('\n');
    }
    out
}
