//! Format implementations
//!
//! Each format converts between the block [`Document`](crate::model::Document)
//! and one output representation. Only Markdown parses; every format
//! serializes.

pub mod common;
pub mod html;
pub mod markdown;
pub mod pdf;
pub mod text;
pub mod word;

pub use html::{HtmlFormat, HtmlOptions, HtmlTheme};
pub use markdown::MarkdownFormat;
pub use pdf::{PageSetup, PdfFormat};
pub use text::TextFormat;
pub use word::{WordFormat, WordOptions};
