//! Line-oriented block scanner (Markdown → `Vec<Block>`).
//!
//! One forward pass over the lines of the source. The only state carried
//! from line to line is the open code fence: while it is open, lines are
//! buffered verbatim (indentation included) and never classified.
//!
//! Classification of a trimmed, non-blank line, most specific first:
//!
//! | Prefix                      | Block                          |
//! |-----------------------------|--------------------------------|
//! | ```` ``` ````               | opens / closes a code block    |
//! | `###### ` … `# `            | heading, level = hash count    |
//! | `- `, `* `, `+ `            | unordered list item            |
//! | digits + `.` + whitespace   | ordered list item              |
//! | `> `                        | quote                          |
//! | exactly `---` `***` `___`   | horizontal rule                |
//! | anything else               | paragraph                      |
//!
//! Blank lines separate blocks and are never represented. A fence left open
//! at the end of the input drops its buffered lines.

use crate::model::{Block, BlockKind, Document, RichTextRun};
use crate::parser::inline::format_inline;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

const FENCE: &str = "```";
const MAX_HEADING_LEVEL: usize = 6;

static ORDERED_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\s").expect("ordered list marker pattern is valid"));

/// Parse Markdown source into a [`Document`].
pub fn parse_document(source: &str) -> Document {
    Document::new(parse_blocks(source))
}

/// Parse Markdown source into an ordered block sequence.
pub fn parse_blocks(source: &str) -> Vec<Block> {
    let mut scanner = BlockScanner::default();
    for (index, line) in source.lines().enumerate() {
        scanner.push_line(index, line);
    }
    let blocks = scanner.finish();
    debug!(blocks = blocks.len(), "parsed markdown source");
    blocks
}

/// An open fenced region.
#[derive(Debug)]
struct OpenFence {
    language: String,
    start_line: usize,
    lines: Vec<String>,
}

#[derive(Debug, Default)]
struct BlockScanner {
    blocks: Vec<Block>,
    fence: Option<OpenFence>,
}

impl BlockScanner {
    fn push_line(&mut self, index: usize, line: &str) {
        let trimmed = line.trim();

        if let Some(info) = trimmed.strip_prefix(FENCE) {
            self.toggle_fence(index, info);
            return;
        }

        if let Some(fence) = self.fence.as_mut() {
            fence.lines.push(line.to_string());
            return;
        }

        if trimmed.is_empty() {
            return;
        }

        self.blocks.push(classify_line(index, trimmed));
    }

    fn toggle_fence(&mut self, index: usize, info: &str) {
        match self.fence.take() {
            Some(fence) => {
                let content = fence.lines.join("\n");
                self.blocks.push(Block::new(
                    BlockKind::CodeBlock {
                        language: fence.language,
                    },
                    content.clone(),
                    vec![RichTextRun::plain(content)],
                    fence.start_line,
                ));
            }
            None => {
                self.fence = Some(OpenFence {
                    language: info.trim().to_string(),
                    start_line: index,
                    lines: Vec::new(),
                });
            }
        }
    }

    fn finish(self) -> Vec<Block> {
        if let Some(fence) = self.fence {
            warn!(
                line = fence.start_line,
                dropped_lines = fence.lines.len(),
                "unterminated code fence; buffered lines discarded"
            );
        }
        self.blocks
    }
}

/// Classify a trimmed, non-blank line outside any code fence.
fn classify_line(index: usize, trimmed: &str) -> Block {
    let (kind, content) = split_marker(trimmed);
    if kind == BlockKind::HorizontalRule {
        return Block::new(kind, String::new(), Vec::new(), index);
    }
    let rich = format_inline(content);
    Block::new(kind, content, rich, index)
}

fn split_marker(trimmed: &str) -> (BlockKind, &str) {
    for level in (1..=MAX_HEADING_LEVEL).rev() {
        if let Some(rest) = strip_heading_marker(trimmed, level) {
            return (
                BlockKind::Heading {
                    level: level as u8,
                },
                rest,
            );
        }
    }

    for marker in ["- ", "* ", "+ "] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            return (BlockKind::UnorderedListItem, rest);
        }
    }

    if let Some(found) = ORDERED_MARKER.find(trimmed) {
        return (BlockKind::OrderedListItem, &trimmed[found.end()..]);
    }

    if let Some(rest) = trimmed.strip_prefix("> ") {
        return (BlockKind::Quote, rest);
    }

    if matches!(trimmed, "---" | "***" | "___") {
        return (BlockKind::HorizontalRule, "");
    }

    (BlockKind::Paragraph, trimmed)
}

fn strip_heading_marker(line: &str, level: usize) -> Option<&str> {
    let bytes = line.as_bytes();
    if bytes.len() <= level {
        return None;
    }
    if bytes[..level].iter().all(|b| *b == b'#') && bytes[level] == b' ' {
        Some(&line[level + 1..])
    } else {
        None
    }
}
