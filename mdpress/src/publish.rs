//! Document publishing pipeline.
//!
//! One call from a parsed [`Document`] to a finished artifact: format lookup,
//! serialization with options, and optional file output. Hosts use this for
//! "Export as PDF" or "Share as HTML" style actions.
//!
//! For more control over the conversion process, use [`FormatRegistry`] directly.

use crate::error::FormatError;
use crate::format::SerializedDocument;
use crate::model::Document;
use crate::registry::FormatRegistry;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Specifies how to publish a document.
///
/// ```ignore
/// let spec = PublishSpec::new(&document, "pdf")
///     .with_output_path("notes.pdf")
///     .with_option("page-size", "letter");
/// ```
///
/// Without an output path, text formats return in-memory content. Binary
/// formats (PDF) require an explicit output path.
#[derive(Debug)]
pub struct PublishSpec<'a> {
    pub document: &'a Document,
    /// Target format name (e.g., "html", "markdown", "pdf").
    pub format: &'a str,
    /// File to write. Required for binary formats.
    pub output: Option<PathBuf>,
    /// Format-specific options (e.g., theme, margin, page size).
    pub options: HashMap<String, String>,
}

impl<'a> PublishSpec<'a> {
    pub fn new(document: &'a Document, format: &'a str) -> Self {
        Self {
            document,
            format,
            output: None,
            options: HashMap::new(),
        }
    }

    pub fn with_output_path(mut self, path: impl AsRef<Path>) -> Self {
        self.output = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// The output from a successful publish operation.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishArtifact {
    /// Content held in memory (text formats without an output path).
    InMemory(String),
    /// Path to the written file.
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishResult {
    pub artifact: PublishArtifact,
}

/// Publishes a document with the default format registry.
///
/// # Errors
///
/// Returns [`FormatError`] if the format is unknown, an option is rejected,
/// writing the file fails, or a binary format is requested without an output
/// path.
pub fn publish(spec: PublishSpec<'_>) -> Result<PublishResult, FormatError> {
    publish_with(&FormatRegistry::with_defaults(), spec)
}

/// Publishes a document through a caller-supplied registry.
pub fn publish_with(
    registry: &FormatRegistry,
    spec: PublishSpec<'_>,
) -> Result<PublishResult, FormatError> {
    let serialized = registry.serialize_with_options(spec.document, spec.format, &spec.options)?;
    debug!(format = spec.format, output = ?spec.output, "publishing document");
    match serialized {
        SerializedDocument::Text(text) => write_or_return_text(text, spec.output),
        SerializedDocument::Binary(bytes) => write_binary(bytes, spec.output),
    }
}

fn write_or_return_text(
    text: String,
    output: Option<PathBuf>,
) -> Result<PublishResult, FormatError> {
    if let Some(path) = output {
        write_to_path(path, text.into_bytes()).map(|path| PublishResult {
            artifact: PublishArtifact::File(path),
        })
    } else {
        Ok(PublishResult {
            artifact: PublishArtifact::InMemory(text),
        })
    }
}

fn write_binary(bytes: Vec<u8>, output: Option<PathBuf>) -> Result<PublishResult, FormatError> {
    let path = output.ok_or_else(|| {
        FormatError::SerializationError(
            "binary formats require an explicit output path".to_string(),
        )
    })?;
    write_to_path(path, bytes).map(|path| PublishResult {
        artifact: PublishArtifact::File(path),
    })
}

fn write_to_path(path: PathBuf, bytes: Vec<u8>) -> Result<PathBuf, FormatError> {
    fs::write(&path, &bytes)
        .map(|_| path.clone())
        .map_err(|err| {
            FormatError::SerializationError(format!("{}: {err}", path.display()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;
    use tempfile::tempdir;

    const SAMPLE: &str = "# Title\n\nParagraph text.\n";

    #[test]
    fn publishes_to_memory_when_no_output_path() {
        let doc = parse_document(SAMPLE);
        let result = publish(PublishSpec::new(&doc, "html")).expect("publish");
        match result.artifact {
            PublishArtifact::InMemory(content) => {
                assert!(content.contains("<p>Paragraph text.</p>"));
            }
            PublishArtifact::File(_) => panic!("expected in-memory artifact"),
        }
    }

    #[test]
    fn writes_to_disk_when_output_path_provided() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("output.txt");
        let doc = parse_document(SAMPLE);
        let result =
            publish(PublishSpec::new(&doc, "text").with_output_path(&path)).expect("publish");
        match result.artifact {
            PublishArtifact::File(p) => assert_eq!(p, path),
            PublishArtifact::InMemory(_) => panic!("expected file artifact"),
        }
        assert_eq!(fs::read_to_string(path).unwrap(), "Title\nParagraph text.");
    }

    #[test]
    fn binary_format_requires_output_path() {
        let doc = parse_document(SAMPLE);
        let result = publish(PublishSpec::new(&doc, "pdf"));
        assert!(matches!(result, Err(FormatError::SerializationError(_))));
    }

    #[test]
    fn writes_pdf_with_options() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        let doc = parse_document(SAMPLE);
        publish(
            PublishSpec::new(&doc, "pdf")
                .with_output_path(&path)
                .with_option("page-size", "letter"),
        )
        .expect("publish");

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
    }

    #[test]
    fn unknown_format_is_reported() {
        let doc = parse_document(SAMPLE);
        let result = publish(PublishSpec::new(&doc, "rtf"));
        assert_eq!(
            result.unwrap_err(),
            FormatError::FormatNotFound("rtf".to_string())
        );
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.html");
        let doc = parse_document(SAMPLE);
        let result = publish(PublishSpec::new(&doc, "html").with_output_path(path));
        assert!(matches!(result, Err(FormatError::SerializationError(_))));
    }
}
