//! Block layout: fonts, indentation and line wrapping for one block.
//!
//! [`layout_block`] is the single source of truth for a block's geometry. The
//! paginator asks it for the height when deciding page breaks and then draws
//! the very same lines, so measured and drawn heights cannot disagree.

use super::fonts::{FontFace, FontSet};
use super::PageSetup;
use crate::model::{Block, BlockKind, RichTextRun};

/// Heading sizes in points for levels 1 through 6.
pub const HEADING_SIZES: [f32; 6] = [24.0, 20.0, 18.0, 16.0, 14.0, 12.0];
/// Left indent of list item text; the marker sits in this gutter.
pub const LIST_INDENT: f32 = 20.0;
/// Left indent of quote text, right of the vertical rule.
pub const QUOTE_INDENT: f32 = 14.0;
/// Left indent of code block text.
pub const CODE_INDENT: f32 = 8.0;
/// Height of the slot a horizontal rule occupies.
pub const RULE_HEIGHT: f32 = 12.0;
/// Columns a tab expands to inside code blocks.
const TAB_WIDTH: usize = 4;

/// A run of text placed on a line, `x` relative to the line start.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidFragment {
    pub x: f32,
    pub text: String,
    pub face: FontFace,
}

/// One wrapped line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LaidLine {
    pub fragments: Vec<LaidFragment>,
    pub width: f32,
}

/// Extra drawing a block carries besides its text.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoration {
    None,
    /// Vertical rule along the left edge of a quote.
    QuoteBar,
    /// Horizontal rule centered in a fixed-height slot.
    Rule,
}

/// Geometry of one block, ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockLayout {
    pub lines: Vec<LaidLine>,
    pub size: f32,
    pub line_height: f32,
    /// Offset of the text from the left margin.
    pub indent: f32,
    /// List marker drawn in the gutter of the first line.
    pub marker: Option<LaidFragment>,
    pub decoration: Decoration,
}

impl BlockLayout {
    pub fn height(&self) -> f32 {
        match self.decoration {
            Decoration::Rule => RULE_HEIGHT,
            _ => self.lines.len() as f32 * self.line_height,
        }
    }
}

/// Lay out `block` for the content box of `setup`, measuring with `fonts`.
///
/// `ordinal` is the 1-based position of an ordered list item within its run.
pub fn layout_block(
    block: &Block,
    ordinal: Option<usize>,
    setup: &PageSetup,
    fonts: &FontSet,
) -> BlockLayout {
    let width = setup.content_width();

    let (size, bold, italic, indent, decoration) = match &block.kind {
        BlockKind::Heading { level } => {
            let index = usize::from(*level).clamp(1, HEADING_SIZES.len()) - 1;
            (HEADING_SIZES[index], true, false, 0.0, Decoration::None)
        }
        BlockKind::Paragraph => (setup.body_size, false, false, 0.0, Decoration::None),
        BlockKind::UnorderedListItem | BlockKind::OrderedListItem => {
            (setup.body_size, false, false, LIST_INDENT, Decoration::None)
        }
        BlockKind::Quote => (setup.body_size, false, true, QUOTE_INDENT, Decoration::QuoteBar),
        BlockKind::CodeBlock { .. } => {
            let lines = wrap_code(&block.raw_content, setup.code_size, width - CODE_INDENT, fonts);
            return BlockLayout {
                lines,
                size: setup.code_size,
                line_height: setup.code_size * setup.line_height,
                indent: CODE_INDENT,
                marker: None,
                decoration: Decoration::None,
            };
        }
        BlockKind::HorizontalRule => {
            return BlockLayout {
                lines: Vec::new(),
                size: setup.body_size,
                line_height: setup.body_size * setup.line_height,
                indent: 0.0,
                marker: None,
                decoration: Decoration::Rule,
            };
        }
    };

    let marker = match block.kind {
        BlockKind::UnorderedListItem => Some(LaidFragment {
            x: 4.0,
            text: "•".to_string(),
            face: FontFace::Regular,
        }),
        BlockKind::OrderedListItem => Some(LaidFragment {
            x: 0.0,
            text: format!("{}.", ordinal.unwrap_or(1)),
            face: FontFace::Regular,
        }),
        _ => None,
    };

    BlockLayout {
        lines: wrap_runs(&block.rich_content, size, bold, italic, width - indent, fonts),
        size,
        line_height: size * setup.line_height,
        indent,
        marker,
        decoration,
    }
}

/// Accumulates fragments for the line being filled.
struct LineBuilder<'f> {
    fonts: &'f FontSet,
    line: LaidLine,
    has_words: bool,
}

impl<'f> LineBuilder<'f> {
    fn new(fonts: &'f FontSet) -> Self {
        Self {
            fonts,
            line: LaidLine::default(),
            has_words: false,
        }
    }

    fn push(&mut self, text: &str, face: FontFace, size: f32) {
        if text.is_empty() {
            return;
        }
        let advance = self.fonts.text_width(face, text, size);
        match self.line.fragments.last_mut() {
            Some(last) if last.face == face => last.text.push_str(text),
            _ => self.line.fragments.push(LaidFragment {
                x: self.line.width,
                text: text.to_string(),
                face,
            }),
        }
        self.line.width += advance;
    }

    fn push_word(&mut self, text: &str, face: FontFace, size: f32) {
        self.push(text, face, size);
        self.has_words = true;
    }

    fn take(&mut self) -> LaidLine {
        self.has_words = false;
        std::mem::take(&mut self.line)
    }
}

/// Greedy word wrap of styled runs. Words wider than the line are split by
/// character; whitespace at line breaks is dropped.
pub fn wrap_runs(
    runs: &[RichTextRun],
    size: f32,
    base_bold: bool,
    base_italic: bool,
    max_width: f32,
    fonts: &FontSet,
) -> Vec<LaidLine> {
    let mut lines = Vec::new();
    let mut current = LineBuilder::new(fonts);
    let mut pending_space: Option<(String, FontFace)> = None;

    for run in runs {
        let face = FontFace::for_style(run.bold || base_bold, run.italic || base_italic, run.code);
        for (token, is_space) in split_tokens(&run.text) {
            if is_space {
                if current.has_words {
                    pending_space = Some((token.to_string(), face));
                }
                continue;
            }

            let word_width = fonts.text_width(face, token, size);
            let space_width = pending_space
                .as_ref()
                .map_or(0.0, |(space, space_face)| fonts.text_width(*space_face, space, size));

            if current.has_words && current.line.width + space_width + word_width > max_width {
                lines.push(current.take());
                pending_space = None;
            } else if let Some((space, space_face)) = pending_space.take() {
                current.push(&space, space_face, size);
            }

            if word_width > max_width {
                split_long_word(token, face, size, max_width, &mut current, &mut lines);
            } else {
                current.push_word(token, face, size);
            }
        }
    }

    if current.has_words || lines.is_empty() {
        lines.push(current.take());
    }
    lines
}

fn split_long_word(
    word: &str,
    face: FontFace,
    size: f32,
    max_width: f32,
    current: &mut LineBuilder<'_>,
    lines: &mut Vec<LaidLine>,
) {
    let mut chunk = String::new();
    let mut chunk_width = 0.0;
    for ch in word.chars() {
        let ch_width = current.fonts.char_width(face, ch, size);
        if !chunk.is_empty() && current.line.width + chunk_width + ch_width > max_width {
            current.push_word(&chunk, face, size);
            lines.push(current.take());
            chunk.clear();
            chunk_width = 0.0;
        }
        chunk.push(ch);
        chunk_width += ch_width;
    }
    current.push_word(&chunk, face, size);
}

/// Split text into alternating runs of whitespace and non-whitespace.
fn split_tokens(text: &str) -> Vec<(&str, bool)> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;
    for (index, ch) in text.char_indices() {
        let is_space = ch.is_whitespace();
        match in_space {
            Some(previous) if previous != is_space => {
                tokens.push((&text[start..index], previous));
                start = index;
            }
            _ => {}
        }
        in_space = Some(is_space);
    }
    if let Some(is_space) = in_space {
        tokens.push((&text[start..], is_space));
    }
    tokens
}

/// Wrap code line by line, keeping indentation and breaking by character.
fn wrap_code(content: &str, size: f32, max_width: f32, fonts: &FontSet) -> Vec<LaidLine> {
    let face = FontFace::Mono;
    let mut lines = Vec::new();

    for source_line in content.split('\n') {
        let expanded = source_line.replace('\t', &" ".repeat(TAB_WIDTH));
        let mut current = LineBuilder::new(fonts);
        let mut chunk = String::new();
        let mut chunk_width = 0.0;
        for ch in expanded.chars() {
            let ch_width = fonts.char_width(face, ch, size);
            if !chunk.is_empty() && chunk_width + ch_width > max_width {
                current.push(&chunk, face, size);
                lines.push(current.take());
                chunk.clear();
                chunk_width = 0.0;
            }
            chunk.push(ch);
            chunk_width += ch_width;
        }
        current.push(&chunk, face, size);
        lines.push(current.take());
    }

    lines
}
