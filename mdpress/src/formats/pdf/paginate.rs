//! Pagination: place laid-out blocks onto fixed-size pages.

use super::fonts::{FontFace, FontSet};
use super::layout::{layout_block, BlockLayout, Decoration, HEADING_SIZES, RULE_HEIGHT};
use crate::error::FormatError;
use crate::model::{Block, BlockKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Text drawn when there is nothing to paginate.
pub const EMPTY_DOCUMENT_TEXT: &str = "Empty document";

const QUOTE_BAR_X: f32 = 4.0;
const QUOTE_BAR_WIDTH: f32 = 2.0;
const RULE_WIDTH: f32 = 1.0;
/// Smallest content box, in points, along either axis.
const MIN_CONTENT: f32 = 72.0;

/// Page geometry and typography, all in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    /// Margin applied on all four sides.
    pub margin: f32,
    /// Vertical gap after every block.
    pub block_spacing: f32,
    pub body_size: f32,
    pub code_size: f32,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self::a4()
    }
}

impl PageSetup {
    pub fn a4() -> Self {
        Self {
            width: 595.0,
            height: 842.0,
            margin: 50.0,
            block_spacing: 10.0,
            body_size: 12.0,
            code_size: 10.0,
            line_height: 1.2,
        }
    }

    pub fn letter() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
            ..Self::a4()
        }
    }

    /// Look up a paper size by name (`a4` or `letter`).
    pub fn from_paper_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "a4" => Some(Self::a4()),
            "letter" => Some(Self::letter()),
            _ => None,
        }
    }

    /// Take the paper size of `paper`, keeping margins and typography.
    pub fn with_paper(self, paper: &PageSetup) -> Self {
        Self {
            width: paper.width,
            height: paper.height,
            ..self
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn content_height(&self) -> f32 {
        self.height - 2.0 * self.margin
    }

    /// Check that the setup leaves room to lay text out.
    pub fn validate(&self) -> Result<(), FormatError> {
        let sizes = [
            ("width", self.width),
            ("height", self.height),
            ("body-size", self.body_size),
            ("code-size", self.code_size),
            ("line-height", self.line_height),
        ];
        for (name, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                return Err(FormatError::SerializationError(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        for (name, value) in [("margin", self.margin), ("block-spacing", self.block_spacing)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(FormatError::SerializationError(format!(
                    "{name} must be zero or more, got {value}"
                )));
            }
        }

        if self.content_width() < MIN_CONTENT || self.content_height() < MIN_CONTENT {
            return Err(FormatError::SerializationError(format!(
                "margin {} leaves less than {MIN_CONTENT}pt of content on a {}x{} page",
                self.margin, self.width, self.height
            )));
        }

        let tallest = HEADING_SIZES[0].max(self.body_size).max(self.code_size) * self.line_height;
        if tallest > self.content_height() {
            return Err(FormatError::SerializationError(format!(
                "a {tallest}pt line does not fit the {}pt content height",
                self.content_height()
            )));
        }
        Ok(())
    }

    pub fn top(&self) -> f32 {
        self.margin
    }

    pub fn bottom(&self) -> f32 {
        self.height - self.margin
    }
}

/// One drawing instruction. Coordinates are top-down from the page's upper
/// left corner; text `y` is the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrawCommand {
    Text {
        x: f32,
        y: f32,
        face: FontFace,
        size: f32,
        text: String,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Page {
    pub commands: Vec<DrawCommand>,
}

impl Page {
    /// Text of every text command, in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                DrawCommand::Line { .. } => None,
            })
            .collect()
    }
}

/// A paginated document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pages {
    pub width: f32,
    pub height: f32,
    pub pages: Vec<Page>,
}

impl Pages {
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Page> {
        self.pages.iter()
    }
}

/// Cursor over the page being filled.
struct PageWriter<'a> {
    setup: &'a PageSetup,
    pages: Vec<Page>,
    current: Page,
    y: f32,
}

impl<'a> PageWriter<'a> {
    fn new(setup: &'a PageSetup) -> Self {
        Self {
            setup,
            pages: Vec::new(),
            current: Page::default(),
            y: setup.top(),
        }
    }

    fn page_used(&self) -> bool {
        self.y > self.setup.top()
    }

    /// Start a new page when `height` does not fit below the cursor. A fresh
    /// page always accepts content, even content taller than the page.
    fn reserve(&mut self, height: f32) -> bool {
        if self.y + height > self.setup.bottom() && self.page_used() {
            self.pages.push(std::mem::take(&mut self.current));
            self.y = self.setup.top();
            return true;
        }
        false
    }

    fn push(&mut self, command: DrawCommand) {
        self.current.commands.push(command);
    }

    fn draw_block(&mut self, layout: &BlockLayout) {
        let height = layout.height();
        self.reserve(height);

        if layout.decoration == Decoration::Rule {
            let y = self.y + RULE_HEIGHT / 2.0;
            self.push(DrawCommand::Line {
                x1: self.setup.margin,
                y1: y,
                x2: self.setup.width - self.setup.margin,
                y2: y,
                width: RULE_WIDTH,
            });
            self.y += height;
            return;
        }

        let left = self.setup.margin + layout.indent;
        let mut bar_start = self.y;

        for (index, line) in layout.lines.iter().enumerate() {
            let line_top = self.y;
            if self.reserve(layout.line_height) && layout.decoration == Decoration::QuoteBar {
                if let Some(previous) = self.pages.last_mut() {
                    previous
                        .commands
                        .push(quote_bar(self.setup, bar_start, line_top));
                }
                bar_start = self.y;
            }

            let baseline = self.y + layout.size;
            if index == 0 {
                if let Some(marker) = &layout.marker {
                    self.push(DrawCommand::Text {
                        x: self.setup.margin + marker.x,
                        y: baseline,
                        face: marker.face,
                        size: layout.size,
                        text: marker.text.clone(),
                    });
                }
            }
            for fragment in &line.fragments {
                self.push(DrawCommand::Text {
                    x: left + fragment.x,
                    y: baseline,
                    face: fragment.face,
                    size: layout.size,
                    text: fragment.text.clone(),
                });
            }
            self.y += layout.line_height;
        }

        if layout.decoration == Decoration::QuoteBar {
            self.push(quote_bar(self.setup, bar_start, self.y));
        }
    }

    fn finish(mut self) -> Vec<Page> {
        if self.page_used() || !self.current.commands.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

fn quote_bar(setup: &PageSetup, top: f32, bottom: f32) -> DrawCommand {
    let x = setup.margin + QUOTE_BAR_X;
    DrawCommand::Line {
        x1: x,
        y1: top,
        x2: x,
        y2: bottom,
        width: QUOTE_BAR_WIDTH,
    }
}

/// Lay out and paginate blocks. `setup` is expected to pass
/// [`PageSetup::validate`].
///
/// Blocks are placed top to bottom. A block that does not fit below the
/// cursor moves to a new page; one taller than a whole page is split between
/// lines. Empty input yields a single page with a diagnostic line.
pub fn paginate(blocks: &[Block], setup: &PageSetup, fonts: &FontSet) -> Pages {
    let mut writer = PageWriter::new(setup);
    let mut ordinal = 0usize;
    let mut previous: Option<&BlockKind> = None;

    for block in blocks {
        let number = if block.kind == BlockKind::OrderedListItem {
            ordinal = match previous {
                Some(BlockKind::OrderedListItem) => ordinal + 1,
                _ => 1,
            };
            Some(ordinal)
        } else {
            None
        };

        let layout = layout_block(block, number, setup, fonts);
        writer.draw_block(&layout);
        writer.y += setup.block_spacing;
        previous = Some(&block.kind);
    }

    let mut pages = writer.finish();
    if pages.is_empty() {
        pages.push(Page {
            commands: vec![DrawCommand::Text {
                x: setup.margin,
                y: setup.top() + setup.body_size,
                face: FontFace::Regular,
                size: setup.body_size,
                text: EMPTY_DOCUMENT_TEXT.to_string(),
            }],
        });
    }

    debug!(blocks = blocks.len(), pages = pages.len(), "paginated document");

    Pages {
        width: setup.width,
        height: setup.height,
        pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_blocks;

    fn paginate(blocks: &[Block], setup: &PageSetup) -> Pages {
        super::paginate(blocks, setup, FontSet::bundled().expect("bundled fonts load"))
    }

    fn text_baselines(page: &Page) -> Vec<f32> {
        page.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { y, .. } => Some(*y),
                DrawCommand::Line { .. } => None,
            })
            .collect()
    }

    fn lines(page: &Page) -> Vec<(f32, f32, f32, f32)> {
        page.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Line { x1, y1, x2, y2, .. } => Some((*x1, *y1, *x2, *y2)),
                DrawCommand::Text { .. } => None,
            })
            .collect()
    }

    #[test]
    fn empty_input_gives_diagnostic_page() {
        let pages = paginate(&[], &PageSetup::default());
        assert_eq!(pages.len(), 1);
        assert_eq!(pages.pages[0].texts(), vec![EMPTY_DOCUMENT_TEXT]);
    }

    #[test]
    fn heading_and_paragraph_share_a_page() {
        let setup = PageSetup::default();
        let pages = paginate(&parse_blocks("# Title\n\nBody text."), &setup);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages.pages[0].texts(), vec!["Title", "Body text."]);

        match &pages.pages[0].commands[0] {
            DrawCommand::Text { x, y, face, size, .. } => {
                assert_eq!(*face, FontFace::Bold);
                assert_eq!(*size, 24.0);
                assert_eq!(*x, setup.margin);
                assert_eq!(*y, setup.top() + 24.0);
            }
            other => panic!("expected text, got {other:?}"),
        }
        // 24pt heading: 28.8 line height plus 10 spacing.
        let body_y = setup.top() + 24.0 * 1.2 + 10.0 + 12.0;
        assert!((text_baselines(&pages.pages[0])[1] - body_y).abs() < 1e-3);
    }

    #[test]
    fn text_stays_inside_the_margins() {
        let setup = PageSetup::default();
        let source = (0..120)
            .map(|i| format!("Paragraph number {i} with a few words."))
            .collect::<Vec<_>>()
            .join("\n\n");
        let pages = paginate(&parse_blocks(&source), &setup);

        assert!(pages.len() > 1);
        for page in pages.iter() {
            for y in text_baselines(page) {
                assert!(y > setup.top() && y <= setup.bottom());
            }
        }
        let total: usize = pages.iter().map(|page| page.texts().len()).sum();
        assert_eq!(total, 120);
    }

    #[test]
    fn tall_code_block_flows_across_pages() {
        let setup = PageSetup::default();
        let body = (0..200).map(|i| format!("line {i}")).collect::<Vec<_>>();
        let source = format!("```\n{}\n```", body.join("\n"));
        let pages = paginate(&parse_blocks(&source), &setup);

        // 200 lines at 12pt each over a 742pt content box.
        assert_eq!(pages.len(), 4);
        let drawn: Vec<&str> = pages.iter().flat_map(|page| page.texts()).collect();
        assert_eq!(drawn, body.iter().map(String::as_str).collect::<Vec<_>>());
        for page in pages.iter() {
            for y in text_baselines(page) {
                assert!(y <= setup.bottom());
            }
        }
    }

    #[test]
    fn block_moves_to_next_page_when_it_does_not_fit() {
        let setup = PageSetup::default();
        let filler = (0..57).map(|i| format!("f{i}")).collect::<Vec<_>>().join("\n");
        // 57 code lines end at 50 + 684 + 10 spacing = 744; a five-line code
        // block (60pt) would end past 792.
        let source = format!("```\n{filler}\n```\n\n```\na\nb\nc\nd\ne\n```");
        let pages = paginate(&parse_blocks(&source), &setup);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages.pages[1].texts(), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn ordered_runs_are_numbered() {
        let pages = paginate(
            &parse_blocks("1. a\n1. b\n\npara\n\n9. c\n- d"),
            &PageSetup::default(),
        );
        assert_eq!(
            pages.pages[0].texts(),
            vec!["1.", "a", "2.", "b", "para", "1.", "c", "•", "d"]
        );
    }

    #[test]
    fn list_text_is_indented_past_marker() {
        let setup = PageSetup::default();
        let pages = paginate(&parse_blocks("- item"), &setup);
        let xs: Vec<f32> = pages.pages[0]
            .commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { x, .. } => Some(*x),
                DrawCommand::Line { .. } => None,
            })
            .collect();
        assert_eq!(xs, vec![setup.margin + 4.0, setup.margin + 20.0]);
    }

    #[test]
    fn rule_is_centered_in_its_slot() {
        let setup = PageSetup::default();
        let pages = paginate(&parse_blocks("---"), &setup);
        assert_eq!(
            lines(&pages.pages[0]),
            vec![(50.0, 56.0, setup.width - 50.0, 56.0)]
        );
    }

    #[test]
    fn quote_bar_spans_the_quote() {
        let setup = PageSetup::default();
        let pages = paginate(&parse_blocks("> quoted"), &setup);
        let bar = lines(&pages.pages[0]);
        assert_eq!(bar.len(), 1);
        let (x1, y1, x2, y2) = bar[0];
        assert_eq!(x1, x2);
        assert_eq!(y1, setup.top());
        assert!((y2 - (setup.top() + 12.0 * 1.2)).abs() < 1e-3);
    }

    #[test]
    fn long_quote_draws_a_bar_on_every_page() {
        let setup = PageSetup::default();
        let words = vec!["word"; 4000].join(" ");
        let pages = paginate(&parse_blocks(&format!("> {words}")), &setup);

        assert!(pages.len() > 1);
        for page in pages.iter() {
            assert_eq!(lines(page).len(), 1);
        }
    }

    #[test]
    fn letter_paper_dimensions() {
        let pages = paginate(&parse_blocks("x"), &PageSetup::letter());
        assert_eq!((pages.width, pages.height), (612.0, 792.0));
        assert_eq!(PageSetup::from_paper_name("Letter"), Some(PageSetup::letter()));
        assert_eq!(PageSetup::from_paper_name("legal"), None);
    }

    #[test]
    fn default_setups_are_valid() {
        assert!(PageSetup::a4().validate().is_ok());
        assert!(PageSetup::letter().validate().is_ok());
    }

    #[test]
    fn oversized_margin_is_rejected() {
        let setup = PageSetup {
            margin: 400.0,
            ..PageSetup::a4()
        };
        assert!(matches!(
            setup.validate(),
            Err(FormatError::SerializationError(message)) if message.contains("margin 400")
        ));
        let squeezed = PageSetup {
            margin: 290.0,
            ..PageSetup::a4()
        };
        assert!(squeezed.validate().is_err());
    }

    #[test]
    fn degenerate_typography_is_rejected() {
        for setup in [
            PageSetup { line_height: 0.0, ..PageSetup::a4() },
            PageSetup { body_size: -1.0, ..PageSetup::a4() },
            PageSetup { code_size: f32::NAN, ..PageSetup::a4() },
            PageSetup { block_spacing: -5.0, ..PageSetup::a4() },
            PageSetup { line_height: 40.0, ..PageSetup::a4() },
        ] {
            assert!(setup.validate().is_err(), "{setup:?} accepted");
        }
    }

    #[test]
    fn pages_serialize_for_inspection() {
        let pages = paginate(&parse_blocks("hi"), &PageSetup::default());
        let json = serde_json::to_value(&pages).unwrap();
        assert_eq!(json["pages"][0]["commands"][0]["type"], "text");
        assert_eq!(json["pages"][0]["commands"][0]["text"], "hi");
        assert_eq!(json["pages"][0]["commands"][0]["face"], "Regular");
    }
}
