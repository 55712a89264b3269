//! Helpers shared by the integration tests.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Parse an HTML document the way a browser would.
pub fn parse_html(html: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default()).one(html)
}

fn element_name(handle: &Handle) -> Option<String> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

fn has_class(handle: &Handle, class: &str) -> bool {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs.borrow().iter().any(|attr| {
            &*attr.name.local == "class" && attr.value.split_whitespace().any(|c| c == class)
        }),
        _ => false,
    }
}

/// Every element named `name` in document order.
pub fn find_all(handle: &Handle, name: &str) -> Vec<Handle> {
    let mut found = Vec::new();
    collect(handle, &mut |node| element_name(node).as_deref() == Some(name), &mut found);
    found
}

/// First element carrying `class`.
pub fn find_by_class(handle: &Handle, class: &str) -> Option<Handle> {
    let mut found = Vec::new();
    collect(handle, &mut |node| has_class(node, class), &mut found);
    found.into_iter().next()
}

fn collect(handle: &Handle, matches: &mut dyn FnMut(&Handle) -> bool, out: &mut Vec<Handle>) {
    if matches(handle) {
        out.push(handle.clone());
    }
    for child in handle.children.borrow().iter() {
        collect(child, matches, out);
    }
}

/// Names of the element children of `handle`, skipping text nodes.
pub fn child_element_names(handle: &Handle) -> Vec<String> {
    handle
        .children
        .borrow()
        .iter()
        .filter_map(element_name)
        .collect()
}

/// Concatenated text below `handle`.
pub fn text_content(handle: &Handle) -> String {
    let mut text = String::new();
    append_text(handle, &mut text);
    text
}

fn append_text(handle: &Handle, out: &mut String) {
    if let NodeData::Text { contents } = &handle.data {
        out.push_str(&contents.borrow());
    }
    for child in handle.children.borrow().iter() {
        append_text(child, out);
    }
}
