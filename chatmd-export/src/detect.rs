//! Author role and timestamp heuristics.
//!
//! Best-effort classification of a message node. A wrong guess produces a
//! mislabeled section, never a failure; anything unrecognizable falls back to
//! the assistant role.

use markup5ever_rcdom::Handle;

use crate::dom;
use crate::ir::nodes::Role;

/// Hint substrings checked against accessible labels and class names, in
/// priority order.
const ROLE_HINTS: &[(&str, Role)] = &[
    ("assistant", Role::Assistant),
    ("user", Role::User),
    ("system", Role::System),
    ("tool", Role::Tool),
];

/// Classify the author of a message node.
pub fn detect_role(node: &Handle) -> Role {
    if let Some(role) = explicit_role(node) {
        return role;
    }

    let mut haystack = String::new();
    dom::walk(node, &mut |n| {
        if let Some(label) = dom::attr(n, "aria-label") {
            haystack.push_str(&label);
            haystack.push(' ');
        }
        if let Some(class) = dom::attr(n, "class") {
            haystack.push_str(&class);
            haystack.push(' ');
        }
        true
    });
    let haystack = haystack.to_ascii_lowercase();

    for (hint, role) in ROLE_HINTS {
        if haystack.contains(hint) {
            return *role;
        }
    }
    Role::default()
}

/// Explicit author-role attribute on the node or a descendant.
fn explicit_role(node: &Handle) -> Option<Role> {
    let value = dom::attr(node, "data-message-author-role").or_else(|| {
        let carrier = dom::find_first(node, &|n| {
            dom::attr(n, "data-message-author-role").is_some()
        })?;
        dom::attr(&carrier, "data-message-author-role")
    })?;
    Some(parse_role(&value))
}

fn parse_role(value: &str) -> Role {
    match value.trim().to_ascii_lowercase().as_str() {
        "user" => Role::User,
        "system" => Role::System,
        "tool" => Role::Tool,
        _ => Role::Assistant,
    }
}

/// Timestamp of a message node: a `<time>` descendant's `datetime` attribute,
/// else its visible text. `None` when nothing usable is present.
pub fn detect_timestamp(node: &Handle) -> Option<String> {
    let time = if dom::tag_name(node).as_deref() == Some("time") {
        node.clone()
    } else {
        dom::find_first(node, &|n| dom::tag_name(n).as_deref() == Some("time"))?
    };
    let stamp = dom::attr(&time, "datetime")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| dom::text_content(&time).trim().to_string());
    if stamp.is_empty() {
        None
    } else {
        Some(stamp)
    }
}
