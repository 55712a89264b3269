//! Markdown to structured document conversion
//!
//!     This crate turns Markdown text into a flat sequence of typed blocks and renders those
//!     blocks as HTML, a paginated PDF, Word-compatible HTML or plain text. A bounded,
//!     deduplicating document history sits next to the pipeline.
//!
//!     TLDR:
//!         - Parsing is line oriented and never fails: any text yields a Document.
//!         - Inline formatting (bold, italic, code) comes from comrak, one line at a time.
//!         - Renderers are pure functions over blocks; identical input gives identical output.
//!         - The history store takes its storage backend as a parameter, there is no global state.
//!
//!     This is a pure lib, no code here assumes a shell environment (stdout, env vars, a
//!     logging subscriber). Hosts install their own `tracing` subscriber.
//!
//! Architecture
//!
//!     raw text → parser::parse_blocks → Vec<Block> → one of the renderers → output
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # thiserror enums for formats, fonts, storage and history
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── publish.rs              # one-call conversion with optional file output
//!     ├── model                   # Block, BlockKind, RichTextRun, Document
//!     ├── parser
//!     │   ├── block.rs            # line scanner and fence state machine
//!     │   └── inline.rs           # comrak-backed inline formatter
//!     ├── formats
//!     │   ├── common              # block → HTML body shared by html and word
//!     │   ├── html | word | text | markdown
//!     │   └── pdf                 # fonts, layout, pagination, PDF writer
//!     └── history                 # HistoryStore, OrderedHistory, storage backends
//!
//! Testing
//!
//!     Unit tests live next to the code. Cross-module scenarios and properties live in
//!     tests/, aggregated by tests/lib.rs because rust does not discover tests in
//!     subdirectories on its own.
//!
//! Formats
//!
//!     Format specific capabilities are implemented with the Format trait. See
//!     [`format::Format`].
//!     - markdown: parse, and serialize back to normalized Markdown
//!     - html: standalone HTML5 with embedded, themeable CSS
//!     - word: HTML with Office metadata and a print stylesheet
//!     - pdf: paginated layout written as PDF with embedded font subsets (binary)
//!     - text: plain text with all markup removed
//!
pub mod error;
pub mod format;
pub mod formats;
pub mod history;
pub mod model;
pub mod parser;
pub mod publish;
pub mod registry;

pub use error::{FontError, FormatError, HistoryError, StorageError};
pub use format::{Format, SerializedDocument};
pub use formats::html::HtmlTheme;
pub use history::{CommitOutcome, HistoryItem, HistoryStore};
pub use model::{Block, BlockKind, Document, RichTextRun};
pub use parser::{parse_blocks, parse_document};
pub use registry::FormatRegistry;

use formats::html::HtmlOptions;
use formats::pdf::{FontSet, PageSetup, Pages};

/// Parses Markdown and renders a standalone HTML document.
pub fn markdown_to_html(source: &str, options: &HtmlOptions) -> String {
    formats::html::render_html(&parse_blocks(source), options)
}

/// Parses Markdown and lays it out onto pages with the bundled fonts, without
/// encoding a file.
pub fn markdown_to_pages(source: &str, setup: &PageSetup) -> Result<Pages, FormatError> {
    setup.validate()?;
    let fonts = FontSet::bundled()?;
    Ok(formats::pdf::paginate(&parse_blocks(source), setup, fonts))
}

/// Parses Markdown and renders a PDF file with the bundled fonts.
pub fn markdown_to_pdf(source: &str, setup: &PageSetup) -> Result<Vec<u8>, FormatError> {
    setup.validate()?;
    formats::pdf::render_pdf(&parse_blocks(source), setup, FontSet::bundled()?)
}

/// Parses Markdown and renders Word-compatible HTML.
pub fn markdown_to_word(source: &str, options: &formats::word::WordOptions) -> String {
    formats::word::render_word_html(&parse_blocks(source), options)
}

/// Parses Markdown and strips it down to plain text.
pub fn markdown_to_text(source: &str) -> String {
    formats::text::render_plain_text(&parse_blocks(source))
}
