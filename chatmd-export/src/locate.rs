//! Message node location.
//!
//! The page markup has gone through several generations, so location is a
//! prioritized list of attribute matchers rather than one hardcoded schema.
//! The default list covers the known generations; callers can extend or
//! replace it through configuration.

use markup5ever_rcdom::{Handle, RcDom};
use serde::{Deserialize, Serialize};

use crate::dom;

/// One structural marker a message root can carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matcher {
    /// Attribute that marks a message root
    pub attr: String,
    /// Required value prefix; any value matches when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl Matcher {
    pub fn present(attr: &str) -> Self {
        Matcher {
            attr: attr.to_string(),
            prefix: None,
        }
    }

    pub fn prefixed(attr: &str, prefix: &str) -> Self {
        Matcher {
            attr: attr.to_string(),
            prefix: Some(prefix.to_string()),
        }
    }

    fn matches(&self, node: &Handle) -> bool {
        match dom::attr(node, &self.attr) {
            Some(value) => self
                .prefix
                .as_ref()
                .map_or(true, |p| value.starts_with(p.as_str())),
            None => false,
        }
    }
}

/// Known markup generations: message-id carriers (old and new layouts) and
/// author-role carriers.
pub fn default_matchers() -> Vec<Matcher> {
    vec![
        Matcher::present("data-message-id"),
        Matcher::prefixed("data-testid", "conversation-turn"),
        Matcher::present("data-message-author-role"),
    ]
}

/// One located message root.
#[derive(Debug, Clone)]
pub struct LocatedMessage {
    /// Identity key: the message-id attribute, else `tag#ordinal`
    pub key: String,
    pub node: Handle,
}

/// Find the distinct message roots of the document, in document order.
///
/// Each root is reported exactly once even when it matches several patterns,
/// and a match claims its whole subtree so nested generation markers inside
/// it do not produce duplicates. De-duplication runs on the identity key,
/// which also drops re-rendered copies carrying the same message id.
pub fn locate_messages(dom: &RcDom, matchers: &[Matcher]) -> Vec<LocatedMessage> {
    let mut located: Vec<LocatedMessage> = Vec::new();
    let mut seen: std::collections::HashSet<String> = std::collections::HashSet::new();
    let mut ordinal = 0usize;

    dom::walk(&dom.document, &mut |node| {
        if !dom::is_element(node) {
            return true;
        }
        if !matchers.iter().any(|m| m.matches(node)) {
            return true;
        }

        let key = dom::attr(node, "data-message-id").unwrap_or_else(|| {
            let tag = dom::tag_name(node).unwrap_or_default();
            format!("{tag}#{ordinal}")
        });
        ordinal += 1;

        if seen.insert(key.clone()) {
            located.push(LocatedMessage {
                key,
                node: node.clone(),
            });
        }
        // the subtree belongs to this message; don't look inside for more
        false
    });

    located
}
