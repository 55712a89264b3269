//! Export tests for Markdown (blocks → normalized Markdown)

use insta::assert_snapshot;
use mdpress::format::Format;
use mdpress::formats::markdown::MarkdownFormat;
use mdpress::parse_document;

fn normalize(source: &str) -> String {
    MarkdownFormat.serialize(&parse_document(source)).unwrap()
}

#[test]
fn test_normalized_output() {
    let source = "#  Spaced\n* one\n+ two\n\n\n\n4. four\n7. seven\n> quote\n___\n```js\nlet x;\n```";
    assert_snapshot!(normalize(source), @r"
    #  Spaced

    - one
    - two

    1. four
    2. seven

    > quote

    ---

    ```js
    let x;
    ```
    ");
}

#[test]
fn test_normalization_is_a_fixed_point() {
    let source = "# T\n\n* a\n1. b\n\ntext *em*\n\n```\n  keep\n```";
    let once = normalize(source);
    assert_eq!(normalize(&once), once);
}
