//! Inline-styled text runs.

use serde::{Deserialize, Serialize};

/// A span of text tagged with inline style flags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RichTextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
}

impl RichTextRun {
    /// A run with every flag cleared.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn code(mut self) -> Self {
        self.code = true;
        self
    }

    /// Whether two runs carry the same flags and can be merged.
    pub fn same_style(&self, other: &RichTextRun) -> bool {
        self.bold == other.bold && self.italic == other.italic && self.code == other.code
    }
}

/// Concatenate the text of `runs`, discarding style flags.
pub fn plain_text(runs: &[RichTextRun]) -> String {
    runs.iter().map(|run| run.text.as_str()).collect()
}
