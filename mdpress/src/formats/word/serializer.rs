//! Word HTML serialization (blocks → Word-compatible HTML)

use crate::formats::common::{blocks_to_html_body, escape_html};
use crate::model::{first_heading_text, Block};
use tracing::debug;

const DEFAULT_TITLE: &str = "Document";

/// Options for Word export
#[derive(Debug, Clone, PartialEq)]
pub struct WordOptions {
    /// Page margin on every side, in points
    pub margin: f32,
    /// Document title; defaults to the first heading
    pub title: Option<String>,
}

impl Default for WordOptions {
    fn default() -> Self {
        Self {
            margin: 72.0,
            title: None,
        }
    }
}

/// Render blocks to a Word-compatible HTML document.
pub fn render_word_html(blocks: &[Block], options: &WordOptions) -> String {
    let body_html = blocks_to_html_body(blocks);
    let title = options
        .title
        .clone()
        .or_else(|| first_heading_text(blocks))
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let escaped_title = escape_html(&title);
    let css = include_str!("../../../css/word.css").replace("{margin}", &options.margin.to_string());

    debug!(blocks = blocks.len(), margin = options.margin, "rendering Word HTML document");

    format!(
        r#"<html xmlns:o="urn:schemas-microsoft-com:office:office" xmlns:w="urn:schemas-microsoft-com:office:word" xmlns="http://www.w3.org/TR/REC-html40">
<head>
<meta http-equiv="Content-Type" content="text/html; charset=utf-8">
<meta name="ProgId" content="Word.Document">
<meta name="Generator" content="mdpress">
<title>{escaped_title}</title>
<!--[if gte mso 9]>
<xml>
<w:WordDocument>
<w:View>Print</w:View>
<w:Zoom>100</w:Zoom>
<w:DoNotOptimizeForBrowser/>
</w:WordDocument>
</xml>
<![endif]-->
<style>
{css}
</style>
</head>
<body lang="EN-US">
<div class="WordSection1">
{body_html}</div>
</body>
</html>
"#
    )
}
