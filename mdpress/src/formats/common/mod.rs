//! Shared building blocks for the output formats.
//!
//! The HTML and Word renderers differ only in their document wrapper and
//! stylesheet; both build their body with [`html_body::blocks_to_html_body`].

pub mod html_body;

pub use html_body::{blocks_to_html_body, escape_html, runs_to_html};
