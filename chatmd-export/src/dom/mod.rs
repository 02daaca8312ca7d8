//! Thin helpers over the html5ever / rcdom document tree.
//!
//! The rest of the crate works in terms of these queries so the rcdom
//! plumbing (tendrils, RefCell borrows, qualified names) stays in one place.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::error::ExportError;

/// Parse an HTML snapshot into an rcdom tree.
///
/// html5ever recovers from malformed markup the way a browser would, so this
/// only fails on I/O-level trouble reading the input.
pub fn parse_html(html: &str) -> Result<RcDom, ExportError> {
    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(|e| ExportError::Parse(e.to_string()))
}

/// Lowercase tag name of an element node.
pub fn tag_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref().to_ascii_lowercase()),
        _ => None,
    }
}

/// Value of the named attribute, if the node is an element carrying it.
pub fn attr(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| a.name.local.as_ref().eq_ignore_ascii_case(name))
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

/// Whitespace-separated class list of an element, empty for anything else.
pub fn classes(node: &Handle) -> Vec<String> {
    attr(node, "class")
        .map(|v| v.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn has_class(node: &Handle, class: &str) -> bool {
    classes(node).iter().any(|c| c == class)
}

/// Snapshot of the node's children (released borrow, safe to recurse over).
pub fn children(node: &Handle) -> Vec<Handle> {
    node.children.borrow().iter().cloned().collect()
}

/// Preorder walk. The callback returns whether to descend into the node's
/// children, which lets callers claim a subtree and skip its interior.
pub fn walk(node: &Handle, f: &mut impl FnMut(&Handle) -> bool) {
    if f(node) {
        for child in children(node) {
            walk(&child, f);
        }
    }
}

/// First descendant (self excluded, document order) satisfying the predicate.
pub fn find_first(node: &Handle, pred: &impl Fn(&Handle) -> bool) -> Option<Handle> {
    for child in children(node) {
        if pred(&child) {
            return Some(child);
        }
        if let Some(found) = find_first(&child, pred) {
            return Some(found);
        }
    }
    None
}

/// Flattened text of the subtree, skipping any node the filter rejects.
pub fn text_content_with(node: &Handle, keep: &impl Fn(&Handle) -> bool) -> String {
    let mut out = String::new();
    collect_text(node, keep, &mut out);
    out
}

/// Flattened text of the whole subtree.
pub fn text_content(node: &Handle) -> String {
    text_content_with(node, &|_| true)
}

fn collect_text(node: &Handle, keep: &impl Fn(&Handle) -> bool, out: &mut String) {
    match &node.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        NodeData::Element { .. } | NodeData::Document => {
            for child in children(node) {
                if keep(&child) {
                    collect_text(&child, keep, out);
                }
            }
        }
        _ => {}
    }
}

pub fn is_element(node: &Handle) -> bool {
    matches!(node.data, NodeData::Element { .. })
}
