//! Block sequence → HTML body fragment.
//!
//! | Block               | HTML                                      |
//! |---------------------|-------------------------------------------|
//! | Heading(n)          | `<hN>` with escaped plain text            |
//! | Paragraph           | `<p>` with inline markup                  |
//! | UnorderedListItem   | `<li>` inside a `<ul>` per consecutive run |
//! | OrderedListItem     | `<li>` inside an `<ol>` per consecutive run |
//! | Quote               | `<blockquote>` with inline markup         |
//! | CodeBlock           | `<pre><code>` with escaped raw content    |
//! | HorizontalRule      | `<hr>`                                    |
//!
//! Inline markup is produced per run: the escaped run text is wrapped in
//! `<code>`, then `<em>`, then `<strong>` according to its flags. Headings drop
//! inline styling on purpose.

use crate::model::{Block, BlockKind, RichTextRun};

/// Render `blocks` as an HTML body fragment, one element per line.
pub fn blocks_to_html_body(blocks: &[Block]) -> String {
    let mut out = String::new();
    let mut in_unordered = false;
    let mut in_ordered = false;

    for block in blocks {
        if in_unordered && block.kind != BlockKind::UnorderedListItem {
            out.push_str("</ul>\n");
            in_unordered = false;
        }
        if in_ordered && block.kind != BlockKind::OrderedListItem {
            out.push_str("</ol>\n");
            in_ordered = false;
        }

        match &block.kind {
            BlockKind::Heading { level } => {
                let text = escape_html(&block.plain_text());
                out.push_str(&format!("<h{level}>{text}</h{level}>\n"));
            }
            BlockKind::Paragraph => {
                out.push_str(&format!("<p>{}</p>\n", runs_to_html(&block.rich_content)));
            }
            BlockKind::UnorderedListItem => {
                if !in_unordered {
                    out.push_str("<ul>\n");
                    in_unordered = true;
                }
                out.push_str(&format!("<li>{}</li>\n", runs_to_html(&block.rich_content)));
            }
            BlockKind::OrderedListItem => {
                if !in_ordered {
                    out.push_str("<ol>\n");
                    in_ordered = true;
                }
                out.push_str(&format!("<li>{}</li>\n", runs_to_html(&block.rich_content)));
            }
            BlockKind::Quote => {
                out.push_str(&format!(
                    "<blockquote>{}</blockquote>\n",
                    runs_to_html(&block.rich_content)
                ));
            }
            BlockKind::CodeBlock { .. } => {
                out.push_str(&format!(
                    "<pre><code>{}</code></pre>\n",
                    escape_html(&block.raw_content)
                ));
            }
            BlockKind::HorizontalRule => out.push_str("<hr>\n"),
        }
    }

    if in_unordered {
        out.push_str("</ul>\n");
    }
    if in_ordered {
        out.push_str("</ol>\n");
    }

    out
}

/// Render styled runs as inline HTML.
pub fn runs_to_html(runs: &[RichTextRun]) -> String {
    let mut out = String::new();
    for run in runs {
        let mut piece = escape_html(&run.text);
        if run.code {
            piece = format!("<code>{piece}</code>");
        }
        if run.italic {
            piece = format!("<em>{piece}</em>");
        }
        if run.bold {
            piece = format!("<strong>{piece}</strong>");
        }
        out.push_str(&piece);
    }
    out
}

/// Escape HTML special characters in text
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_blocks;

    #[test]
    fn escapes_all_special_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn run_flags_nest_in_fixed_order() {
        let runs = vec![RichTextRun::plain("x").bold().italic().code()];
        assert_eq!(
            runs_to_html(&runs),
            "<strong><em><code>x</code></em></strong>"
        );
    }

    #[test]
    fn empty_input_gives_empty_body() {
        assert_eq!(blocks_to_html_body(&[]), "");
    }

    #[test]
    fn list_closes_before_following_block() {
        let body = blocks_to_html_body(&parse_blocks("- a\n- b\n\nc"));
        assert_eq!(body, "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n<p>c</p>\n");
    }

    #[test]
    fn switching_list_kinds_closes_previous_list() {
        let body = blocks_to_html_body(&parse_blocks("- a\n1. b\n- c"));
        assert_eq!(
            body,
            "<ul>\n<li>a</li>\n</ul>\n<ol>\n<li>b</li>\n</ol>\n<ul>\n<li>c</li>\n</ul>\n"
        );
    }

    #[test]
    fn list_at_end_is_closed() {
        let body = blocks_to_html_body(&parse_blocks("1. one\n2. two"));
        assert!(body.ends_with("</ol>\n"));
        assert_eq!(body.matches("<ol>").count(), 1);
    }

    #[test]
    fn heading_uses_plain_escaped_text() {
        let body = blocks_to_html_body(&parse_blocks("## **Bold** & <tag>"));
        assert_eq!(body, "<h2>Bold &amp; &lt;tag&gt;</h2>\n");
    }

    #[test]
    fn code_block_is_escaped_not_formatted() {
        let body = blocks_to_html_body(&parse_blocks("```\nif a < b && **c** {}\n```"));
        assert_eq!(
            body,
            "<pre><code>if a &lt; b &amp;&amp; **c** {}</code></pre>\n"
        );
    }

    #[test]
    fn quote_and_rule() {
        let body = blocks_to_html_body(&parse_blocks("> *said*\n\n---"));
        assert_eq!(body, "<blockquote><em>said</em></blockquote>\n<hr>\n");
    }
}
