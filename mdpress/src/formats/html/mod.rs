//! HTML format implementation
//!
//! Export only: a complete, self-contained HTML5 document with embedded CSS.
//!
//! # Element Mapping
//!
//! The body is produced by the shared block → HTML conversion in
//! [`crate::formats::common::html_body`], so HTML and Word export can never
//! drift apart. See that module for the mapping table.
//!
//! # CSS and Theming
//!
//! HTML export includes embedded CSS from:
//! - `css/baseline.css`: reset + default presentation (always included)
//! - `css/themes/theme-*.css`: colour overrides layered on top of the baseline
//!
//! The theme is an explicit option ([`HtmlTheme`]), never ambient state.
//!
//! # Output Format
//!
//! - Complete HTML5 document structure, UTF-8
//! - Embedded CSS in a `<style>` tag
//! - Mobile-responsive viewport meta tag
//! - No timestamps or random content: identical input gives identical bytes

mod serializer;

use crate::error::FormatError;
use crate::format::{reject_unknown_options, Format, SerializedDocument};
use crate::model::Document;
use std::collections::HashMap;

pub use serializer::{render_html, HtmlOptions};

/// Format implementation for HTML
#[derive(Debug, Clone, Default)]
pub struct HtmlFormat {
    options: HtmlOptions,
}

/// Available CSS themes for HTML export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HtmlTheme {
    /// Dark text on a light background
    #[default]
    Light,
    /// Light text on a dark background
    Dark,
}

impl HtmlTheme {
    /// Parse a theme name as used in options and configuration files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "light" | "default" => Some(HtmlTheme::Light),
            "dark" => Some(HtmlTheme::Dark),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HtmlTheme::Light => "light",
            HtmlTheme::Dark => "dark",
        }
    }
}

impl HtmlFormat {
    /// Create a new HTML format with the specified theme
    pub fn new(theme: HtmlTheme) -> Self {
        Self::with_options(HtmlOptions::new(theme))
    }

    pub fn with_options(options: HtmlOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &HtmlOptions {
        &self.options
    }
}

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "HTML5 format with embedded CSS"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(render_html(&doc.blocks, &self.options))
    }

    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<SerializedDocument, FormatError> {
        reject_unknown_options(self.name(), options, &["theme"])?;

        let mut html_options = self.options.clone();
        if let Some(theme_str) = options.get("theme") {
            html_options.theme = HtmlTheme::from_name(theme_str).ok_or_else(|| {
                FormatError::SerializationError(format!("Unknown HTML theme '{theme_str}'"))
            })?;
        }

        Ok(SerializedDocument::Text(render_html(
            &doc.blocks,
            &html_options,
        )))
    }
}
