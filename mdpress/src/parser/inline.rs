//! Inline formatting (`**bold**`, `*italic*`, `` `code` ``) for a single line.
//!
//! Parsing is delegated to `comrak`, reading the line as a one-paragraph
//! CommonMark document and flattening the inline tree into styled runs.
//!
//! Block structure was already resolved by the line scanner, so a leading
//! character that CommonMark would read as a block start (`# `, `> `, `1) `,
//! `+ `, a fence, a reference definition...) is backslash-escaped first and
//! the line always parses as one paragraph.
//!
//! [`parse_inline`] still reports input that does not come back as a single
//! paragraph, such as text spanning several lines. [`format_inline`] is the
//! caller-side fallback: a failed parse degrades to one unstyled run holding
//! the literal line, so a malformed inline sequence never aborts rendering of
//! the rest of the document.

use crate::model::RichTextRun;
use comrak::nodes::{AstNode, NodeValue};
use comrak::{parse_document, Arena, Options};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use thiserror::Error;
use tracing::debug;

/// Longest digit sequence CommonMark accepts in an ordered list marker.
const MAX_ORDERED_DIGITS: usize = 9;

static LINK_DEFINITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[[^\]]+\]:").expect("link definition pattern is valid"));

/// Reasons a line could not be read as inline Markdown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InlineParseError {
    #[error("line has no inline content")]
    Empty,
    #[error("line reads as a {0}, not a paragraph")]
    NotAParagraph(&'static str),
}

#[derive(Debug, Clone, Copy, Default)]
struct Style {
    bold: bool,
    italic: bool,
}

/// Parse one line of inline Markdown into styled runs.
pub fn parse_inline(line: &str) -> Result<Vec<RichTextRun>, InlineParseError> {
    if line.trim().is_empty() {
        return Err(InlineParseError::Empty);
    }

    let source = escape_block_start(line);
    let arena = Arena::new();
    let options = Options::default();
    let root = parse_document(&arena, &source, &options);

    let mut children = root.children();
    let paragraph = match (children.next(), children.next()) {
        (Some(node), None) => node,
        (None, _) => return Err(InlineParseError::NotAParagraph("definition-only line")),
        (Some(_), Some(_)) => return Err(InlineParseError::NotAParagraph("sequence of blocks")),
    };

    let kind = describe_block(&paragraph.data.borrow().value);
    if let Some(kind) = kind {
        return Err(InlineParseError::NotAParagraph(kind));
    }

    let mut runs = Vec::new();
    for child in paragraph.children() {
        collect_runs(child, Style::default(), &mut runs);
    }

    if runs.is_empty() {
        return Err(InlineParseError::Empty);
    }
    Ok(runs)
}

/// Inline-format `line`, falling back to a single literal run on failure.
pub fn format_inline(line: &str) -> Vec<RichTextRun> {
    match parse_inline(line) {
        Ok(runs) => runs,
        Err(err) => {
            debug!(%err, line, "inline formatting fell back to literal text");
            vec![RichTextRun::plain(line)]
        }
    }
}

/// Backslash-escape the first character of `line` when CommonMark would open
/// a block with it. Leading whitespace is dropped, as a paragraph would.
fn escape_block_start(line: &str) -> Cow<'_, str> {
    let body = line.trim_start();
    match block_start_offset(body) {
        Some(at) => Cow::Owned(format!("{}\\{}", &body[..at], &body[at..])),
        None => Cow::Borrowed(body),
    }
}

/// Byte offset of the character that makes `body` a block start.
fn block_start_offset(body: &str) -> Option<usize> {
    let mut chars = body.chars();
    let first = chars.next()?;
    let followed_by_space = chars.next().map_or(true, char::is_whitespace);

    match first {
        // No inline meaning, so escaping never changes the text.
        '#' | '>' | '-' | '+' | '~' => Some(0),
        '*' => (followed_by_space || is_break_line(body, '*')).then_some(0),
        '_' => is_break_line(body, '_').then_some(0),
        '`' => is_fence_opener(body).then_some(0),
        '<' => opens_html_block(body).then_some(0),
        '[' => LINK_DEFINITION.is_match(body).then_some(0),
        '0'..='9' => ordered_marker_delimiter(body),
        _ => None,
    }
}

/// Three or more `marker` characters and nothing else but spaces.
fn is_break_line(body: &str, marker: char) -> bool {
    body.chars().all(|ch| ch == marker || ch == ' ' || ch == '\t')
        && body.chars().filter(|&ch| ch == marker).count() >= 3
}

fn is_fence_opener(body: &str) -> bool {
    let ticks = body.chars().take_while(|&ch| ch == '`').count();
    ticks >= 3 && !body[ticks..].contains('`')
}

/// `<` followed by something tag-like that is not an autolink.
fn opens_html_block(body: &str) -> bool {
    let rest = &body[1..];
    let tag_like = rest
        .chars()
        .next()
        .is_some_and(|ch| ch.is_ascii_alphabetic() || matches!(ch, '/' | '!' | '?'));
    let autolink = rest.find('>').is_some_and(|end| {
        let target = &rest[..end];
        target.contains(':') && !target.contains(char::is_whitespace) && !target.contains('<')
    });
    tag_like && !autolink
}

/// Offset of the `.` or `)` in a leading `12.` / `12)` list marker.
fn ordered_marker_delimiter(body: &str) -> Option<usize> {
    let digits = body.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || digits > MAX_ORDERED_DIGITS {
        return None;
    }
    let delimiter = body.as_bytes().get(digits)?;
    let after = body[digits + 1..].chars().next();
    (matches!(delimiter, b'.' | b')') && after.map_or(true, char::is_whitespace)).then_some(digits)
}

/// `None` for a paragraph, otherwise a short name for the block comrak saw.
fn describe_block(value: &NodeValue) -> Option<&'static str> {
    match value {
        NodeValue::Paragraph => None,
        NodeValue::List(_) | NodeValue::Item(_) => Some("list item"),
        NodeValue::ThematicBreak => Some("thematic break"),
        NodeValue::Heading(_) => Some("heading"),
        NodeValue::BlockQuote => Some("block quote"),
        NodeValue::CodeBlock(_) => Some("code block"),
        NodeValue::HtmlBlock(_) => Some("HTML block"),
        _ => Some("non-paragraph block"),
    }
}

fn collect_runs<'a>(node: &'a AstNode<'a>, style: Style, runs: &mut Vec<RichTextRun>) {
    let node_data = node.data.borrow();

    match &node_data.value {
        NodeValue::Text(text) => push_run(runs, text, style, false),

        NodeValue::Code(code) => push_run(runs, &code.literal, style, true),

        NodeValue::HtmlInline(html) => push_run(runs, html, style, false),

        NodeValue::SoftBreak | NodeValue::LineBreak => push_run(runs, " ", style, false),

        NodeValue::Strong => {
            let inner = Style {
                bold: true,
                ..style
            };
            for child in node.children() {
                collect_runs(child, inner, runs);
            }
        }

        NodeValue::Emph => {
            let inner = Style {
                italic: true,
                ..style
            };
            for child in node.children() {
                collect_runs(child, inner, runs);
            }
        }

        // Links, images and anything else contribute their text content.
        _ => {
            for child in node.children() {
                collect_runs(child, style, runs);
            }
        }
    }
}

fn push_run(runs: &mut Vec<RichTextRun>, text: &str, style: Style, code: bool) {
    if text.is_empty() {
        return;
    }
    let run = RichTextRun {
        text: text.to_string(),
        bold: style.bold,
        italic: style.italic,
        code,
    };
    match runs.last_mut() {
        Some(last) if last.same_style(&run) => last.text.push_str(&run.text),
        _ => runs.push(run),
    }
}
