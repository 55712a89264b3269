//! Markdown format implementation
//!
//! Parsing goes through the crate's own line-oriented block scanner
//! ([`crate::parser`]); serialization writes the block sequence back out as
//! normalized Markdown.
//!
//! # Element Mapping Table
//!
//! | Block             | Markdown written             | Notes                                   |
//! |-------------------|------------------------------|-----------------------------------------|
//! | Heading(n)        | `#`×n + space + content      | Level preserved (1-6)                   |
//! | Paragraph         | content                      | Leading/trailing whitespace was trimmed |
//! | UnorderedListItem | `- ` + content               | `*` and `+` markers normalize to `-`    |
//! | OrderedListItem   | `N. ` + content              | Renumbered from 1 per consecutive run   |
//! | Quote             | `> ` + content               |                                         |
//! | CodeBlock         | fenced with language tag     | Content verbatim                        |
//! | HorizontalRule    | `---`                        | `***` and `___` normalize to `---`      |
//!
//! Inline markup is carried by the raw content untouched.
//!
//! # Lossy Conversions
//!
//! - Blank line runs collapse to a single separator
//! - List markers and rule spellings normalize as shown above
//! - Unterminated code fences are already gone after parsing
//!
//! Re-parsing serialized output yields the same block kinds and raw content.

pub mod serializer;

use crate::error::FormatError;
use crate::format::Format;
use crate::model::Document;

/// Format implementation for Markdown
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "Line-oriented Markdown"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        Ok(crate::parser::parse_document(source))
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(serializer::serialize_to_markdown(&doc.blocks))
    }
}
