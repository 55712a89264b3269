//! Block-level elements and the owning document wrapper.

use super::rich_text::{plain_text, RichTextRun};
use serde::{Deserialize, Serialize};

/// Structural identity of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    /// `#` through `######`; level is always within `1..=6`.
    Heading { level: u8 },
    Paragraph,
    UnorderedListItem,
    OrderedListItem,
    Quote,
    /// Fenced code; `language` is the text after the opening fence, possibly empty.
    CodeBlock { language: String },
    HorizontalRule,
}

impl BlockKind {
    pub fn is_list_item(&self) -> bool {
        matches!(
            self,
            BlockKind::UnorderedListItem | BlockKind::OrderedListItem
        )
    }
}

/// One classified unit of parsed Markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    /// Source text with the block marker stripped. Empty for rules.
    pub raw_content: String,
    /// Inline-formatted content. Code blocks hold one literal run, rules none.
    pub rich_content: Vec<RichTextRun>,
    /// 0-based line the block came from; an identity key, nothing more.
    pub source_line: usize,
}

impl Block {
    pub fn new(
        kind: BlockKind,
        raw_content: impl Into<String>,
        rich_content: Vec<RichTextRun>,
        source_line: usize,
    ) -> Self {
        Self {
            kind,
            raw_content: raw_content.into(),
            rich_content,
            source_line,
        }
    }

    /// Text of the rich content with the style flags removed.
    pub fn plain_text(&self) -> String {
        plain_text(&self.rich_content)
    }
}

/// A parsed Markdown document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    /// Plain text of the first heading, if any.
    pub fn title(&self) -> Option<String> {
        first_heading_text(&self.blocks)
    }
}

/// Plain text of the first non-blank heading in `blocks`.
pub fn first_heading_text(blocks: &[Block]) -> Option<String> {
    blocks
        .iter()
        .filter(|block| matches!(block.kind, BlockKind::Heading { .. }))
        .map(Block::plain_text)
        .find(|title| !title.trim().is_empty())
}

impl From<Vec<Block>> for Document {
    fn from(blocks: Vec<Block>) -> Self {
        Self::new(blocks)
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
