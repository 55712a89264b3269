//! Plain text export
//!
//! One line per block with all inline formatting removed:
//!
//! - headings, paragraphs, list items and quotes: the text of their runs
//! - code blocks: raw content verbatim, without fences
//! - horizontal rules: a literal `---`
//!
//! Block markers were already stripped by the parser, so they never come back.
//! Inline markers only disappear when inline parsing succeeded; a line that
//! fell back to literal text keeps its asterisks and backticks.

use crate::error::FormatError;
use crate::format::Format;
use crate::model::{Block, BlockKind, Document};

/// Format implementation for plain text
pub struct TextFormat;

impl Format for TextFormat {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Plain text with formatting removed"
    }

    fn file_extensions(&self) -> &[&str] {
        &["txt"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(render_plain_text(&doc.blocks))
    }
}

/// Render blocks as newline-joined plain text, trimmed.
pub fn render_plain_text(blocks: &[Block]) -> String {
    let lines: Vec<String> = blocks
        .iter()
        .map(|block| match block.kind {
            BlockKind::HorizontalRule => "---".to_string(),
            BlockKind::CodeBlock { .. } => block.raw_content.clone(),
            _ => block.plain_text(),
        })
        .collect();
    lines.join("\n").trim().to_string()
}
