//! HTML serialization (blocks → HTML export)
//!
//! Pipeline: `&[Block]` → shared body fragment → complete document with CSS.

use crate::formats::common::{blocks_to_html_body, escape_html};
use crate::formats::html::HtmlTheme;
use crate::model::{first_heading_text, Block};
use std::borrow::Cow;
use tracing::debug;

const DEFAULT_TITLE: &str = "Document";

/// Options for HTML serialization
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtmlOptions {
    /// CSS theme to use
    pub theme: HtmlTheme,
    /// Optional custom CSS to append after the baseline and theme CSS
    pub custom_css: Option<String>,
    /// Document title; defaults to the first heading
    pub title: Option<String>,
}

impl HtmlOptions {
    pub fn new(theme: HtmlTheme) -> Self {
        Self {
            theme,
            ..Self::default()
        }
    }

    pub fn with_custom_css(mut self, css: String) -> Self {
        self.custom_css = Some(css);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Render blocks to a complete HTML document.
pub fn render_html(blocks: &[Block], options: &HtmlOptions) -> String {
    let body = blocks_to_html_body(blocks);
    let title = options
        .title
        .clone()
        .or_else(|| first_heading_text(blocks))
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    debug!(
        blocks = blocks.len(),
        theme = options.theme.name(),
        "rendering HTML document"
    );
    wrap_in_document(&body, &title, options)
}

/// Wrap the content in a complete HTML document with embedded CSS
fn wrap_in_document(body_html: &str, title: &str, options: &HtmlOptions) -> String {
    let baseline_css = include_str!("../../../css/baseline.css");
    let theme_css = match options.theme {
        HtmlTheme::Light => include_str!("../../../css/themes/theme-light.css"),
        HtmlTheme::Dark => include_str!("../../../css/themes/theme-dark.css"),
    };

    let custom_css = escape_style_text(options.custom_css.as_deref().unwrap_or(""));
    let escaped_title = escape_html(title);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <meta name="generator" content="mdpress">
  <title>{escaped_title}</title>
  <style>
{baseline_css}
{theme_css}
{custom_css}
  </style>
</head>
<body>
<article class="markdown-body">
{body_html}</article>
</body>
</html>
"#
    )
}

/// Keep CSS from closing the `<style>` element early. `\/` is a CSS escape
/// for `/`, so style rules keep their meaning.
fn escape_style_text(css: &str) -> Cow<'_, str> {
    if css.contains("</") {
        Cow::Owned(css.replace("</", "<\\/"))
    } else {
        Cow::Borrowed(css)
    }
}
