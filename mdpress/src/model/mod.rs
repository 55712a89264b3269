//! Document model shared by the parser and every renderer.
//!
//! A parsed document is a flat, ordered list of [`Block`]s. There is no tree:
//! the block scanner is line oriented, so each block maps back to one source
//! line (or one fenced region for code blocks).

pub mod block;
pub mod rich_text;

pub use block::{first_heading_text, Block, BlockKind, Document};
pub use rich_text::{plain_text, RichTextRun};
