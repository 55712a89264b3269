//! Paginated document and PDF export.
//!
//! Rendering happens in two steps. [`paginate`] lays blocks out onto pages
//! and produces a serializable [`Pages`] model of positioned text and lines.
//! [`write_pdf`] turns that model into a PDF file, embedding subsets of the
//! fonts in a [`FontSet`]. Layout and the writer pick glyphs through the same
//! set, so measured and drawn text always match.
//!
//! Options accepted by [`PdfFormat`]:
//!
//! - `page-size`: `a4` (default) or `letter`
//! - `margin`: margin on every side, in points
//! - `body-size`: body text size, in points

mod fonts;
mod layout;
mod paginate;
mod writer;

use crate::error::FormatError;
use crate::format::{parse_f32_option, reject_unknown_options, Format, SerializedDocument};
use crate::model::{Block, Document};
use std::collections::HashMap;
use std::sync::Arc;

pub use fonts::{FontFace, FontOptions, FontSet, Glyph, GlyphRun, LoadedFont};
pub use layout::{layout_block, BlockLayout, Decoration, LaidFragment, LaidLine, HEADING_SIZES};
pub use paginate::{paginate, DrawCommand, Page, PageSetup, Pages, EMPTY_DOCUMENT_TEXT};
pub use writer::write_pdf;

/// Format implementation for paginated PDF output
#[derive(Debug, Clone, Default)]
pub struct PdfFormat {
    setup: PageSetup,
    fonts: Option<Arc<FontSet>>,
}

impl PdfFormat {
    pub fn new(setup: PageSetup) -> Self {
        Self { setup, fonts: None }
    }

    /// Render with `fonts` instead of the bundled set.
    pub fn with_fonts(mut self, fonts: Arc<FontSet>) -> Self {
        self.fonts = Some(fonts);
        self
    }

    fn font_set(&self) -> Result<&FontSet, FormatError> {
        match &self.fonts {
            Some(fonts) => Ok(fonts.as_ref()),
            None => Ok(FontSet::bundled()?),
        }
    }

    fn setup_from_options(
        &self,
        options: &HashMap<String, String>,
    ) -> Result<PageSetup, FormatError> {
        reject_unknown_options(self.name(), options, &["margin", "body-size", "page-size"])?;

        let mut setup = self.setup.clone();
        if let Some(name) = options.get("page-size") {
            let paper = PageSetup::from_paper_name(name).ok_or_else(|| {
                FormatError::SerializationError(format!(
                    "Unknown page size '{name}' (expected a4 or letter)"
                ))
            })?;
            setup = setup.with_paper(&paper);
        }
        setup.margin = parse_f32_option(options, "margin", setup.margin)?;
        setup.body_size = parse_f32_option(options, "body-size", setup.body_size)?;

        setup.validate()?;
        Ok(setup)
    }
}

/// Paginate blocks and serialize them as a PDF file.
pub fn render_pdf(
    blocks: &[Block],
    setup: &PageSetup,
    fonts: &FontSet,
) -> Result<Vec<u8>, FormatError> {
    Ok(write_pdf(&paginate(blocks, setup, fonts), fonts)?)
}

impl Format for PdfFormat {
    fn name(&self) -> &str {
        "pdf"
    }

    fn description(&self) -> &str {
        "Paginated PDF document"
    }

    fn file_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, _doc: &Document) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(
            "PDF serialization produces binary output".to_string(),
        ))
    }

    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<SerializedDocument, FormatError> {
        let setup = self.setup_from_options(options)?;
        let bytes = render_pdf(&doc.blocks, &setup, self.font_set()?)?;
        Ok(SerializedDocument::Binary(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;

    fn options(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn render(pairs: &[(&str, &str)]) -> Result<Vec<u8>, FormatError> {
        let doc = parse_document("# Title\n\nBody");
        PdfFormat::default()
            .serialize_with_options(&doc, &options(pairs))
            .map(SerializedDocument::into_bytes)
    }

    fn first_text(setup: &PageSetup, source: &str) -> DrawCommand {
        let fonts = FontSet::bundled().unwrap();
        let doc = parse_document(source);
        paginate(&doc.blocks, setup, fonts).pages[0].commands[0].clone()
    }

    #[test]
    fn produces_binary_without_options() {
        let bytes = render(&[]).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn text_serialization_is_unsupported() {
        let result = PdfFormat::default().serialize(&Document::default());
        assert!(matches!(result, Err(FormatError::NotSupported(_))));
    }

    #[test]
    fn letter_page_size() {
        let bytes = render(&[("page-size", "letter")]).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/MediaBox [0 0 612 792]"));
    }

    #[test]
    fn margin_and_body_size_reach_the_layout() {
        let setup = PdfFormat::default()
            .setup_from_options(&options(&[("margin", "72"), ("body-size", "14")]))
            .unwrap();
        assert_eq!(setup.margin, 72.0);

        match first_text(&setup, "Body") {
            DrawCommand::Text { x, y, size, .. } => {
                assert_eq!(x, 72.0);
                assert_eq!(size, 14.0);
                assert_eq!(y, 72.0 + 14.0);
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn invalid_options() {
        assert!(matches!(
            render(&[("page-size", "legal")]),
            Err(FormatError::SerializationError(_))
        ));
        assert!(matches!(
            render(&[("margin", "400")]),
            Err(FormatError::SerializationError(_))
        ));
        assert!(matches!(
            render(&[("body-size", "0")]),
            Err(FormatError::SerializationError(_))
        ));
        assert!(matches!(
            render(&[("margin", "wide")]),
            Err(FormatError::SerializationError(_))
        ));
        assert!(matches!(
            render(&[("theme", "dark")]),
            Err(FormatError::NotSupported(_))
        ));
    }

    #[test]
    fn invalid_configured_setup_is_rejected() {
        let format = PdfFormat::new(PageSetup {
            margin: 400.0,
            ..PageSetup::a4()
        });
        let result = format.serialize_with_options(&parse_document("x"), &HashMap::new());
        assert!(matches!(result, Err(FormatError::SerializationError(_))));
    }

    #[test]
    fn explicit_font_set_is_used() {
        let fonts = Arc::new(FontSet::load(&FontOptions::default()).unwrap());
        let format = PdfFormat::default().with_fonts(fonts);
        let bytes = format
            .serialize_with_options(&parse_document("Grüße, Ελλάδα"), &HashMap::new())
            .unwrap()
            .into_bytes();
        assert!(bytes.starts_with(b"%PDF-"));
    }
}
