//! Word-compatible HTML export
//!
//! Word (and readers that imitate it) open HTML files carrying the Office
//! namespaces, a `ProgId` meta tag and a `WordDocument` conditional comment as
//! native documents. The body is the same block → HTML conversion used by the
//! HTML format; only the wrapper and the print stylesheet (`css/word.css`,
//! with `@page` size and margins) differ.
//!
//! Conventionally saved with a `.doc` extension.

mod serializer;

use crate::error::FormatError;
use crate::format::{parse_f32_option, reject_unknown_options, Format, SerializedDocument};
use crate::model::Document;
use std::collections::HashMap;

pub use serializer::{render_word_html, WordOptions};

/// Format implementation for Word-compatible HTML
#[derive(Debug, Clone, Default)]
pub struct WordFormat {
    options: WordOptions,
}

impl WordFormat {
    pub fn new(options: WordOptions) -> Self {
        Self { options }
    }
}

impl Format for WordFormat {
    fn name(&self) -> &str {
        "word"
    }

    fn description(&self) -> &str {
        "Word-compatible HTML document"
    }

    fn file_extensions(&self) -> &[&str] {
        &["doc"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(render_word_html(&doc.blocks, &self.options))
    }

    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<SerializedDocument, FormatError> {
        reject_unknown_options(self.name(), options, &["margin"])?;

        let mut word_options = self.options.clone();
        word_options.margin = parse_f32_option(options, "margin", word_options.margin)?;

        Ok(SerializedDocument::Text(render_word_html(
            &doc.blocks,
            &word_options,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;

    #[test]
    fn margin_option_reaches_stylesheet() {
        let doc = parse_document("body");
        let mut options = HashMap::new();
        options.insert("margin".to_string(), "36".to_string());

        let output = WordFormat::default()
            .serialize_with_options(&doc, &options)
            .unwrap();
        let SerializedDocument::Text(html) = output else {
            panic!("expected text output");
        };
        assert!(html.contains("margin: 36pt 36pt 36pt 36pt;"));
    }

    #[test]
    fn rejects_unknown_option() {
        let doc = parse_document("body");
        let mut options = HashMap::new();
        options.insert("theme".to_string(), "dark".to_string());

        let result = WordFormat::default().serialize_with_options(&doc, &options);
        assert!(matches!(result, Err(FormatError::NotSupported(_))));
    }
}
