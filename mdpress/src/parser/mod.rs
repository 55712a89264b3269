//! Markdown parsing: the line-oriented block scanner and the inline formatter.
//!
//! Pipeline: source text → [`parse_blocks`] → `Vec<Block>`; each non-code block's
//! content passes through [`format_inline`] on the way.

pub mod block;
pub mod inline;

pub use block::{parse_blocks, parse_document};
pub use inline::{format_inline, parse_inline, InlineParseError};
