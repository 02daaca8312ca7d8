//! DOM subtree -> block tree conversion.
//!
//! Recursive descent over one message node: a strip pass keeps page chrome
//! out, block elements map to typed [`Block`]s, and everything in between
//! accumulates into inline runs that flush as paragraphs. All failure is
//! local: a node that cannot be converted contributes nothing.

pub mod inline;

use markup5ever_rcdom::{Handle, NodeData};

use crate::dom;
use crate::error::ExportError;
use crate::ir::nodes::{Block, Inline};
use crate::normalize::normalize;
use crate::options::ConversionOptions;

/// Container tags that make a math widget render as a display block.
///
/// Generic ancestor-tag sniffing, tunable: a custom container element will
/// fall through to inline form, which still renders valid Markdown.
const BLOCK_CONTAINERS: &[&str] = &["div", "p", "section", "article", "figure"];

/// Interactive/chrome elements stripped before any text extraction.
pub fn is_chrome(node: &Handle) -> bool {
    let Some(tag) = dom::tag_name(node) else {
        return false;
    };
    if matches!(
        tag.as_str(),
        "button" | "nav" | "svg" | "textarea" | "script" | "style"
    ) {
        return true;
    }
    if let Some(role) = dom::attr(node, "role") {
        if matches!(role.as_str(), "menu" | "menubar" | "navigation" | "toolbar") {
            return true;
        }
    }
    dom::classes(node)
        .iter()
        .any(|c| c.contains("toast") || c.contains("notification"))
}

/// Flattened text of a subtree with chrome stripped.
pub fn visible_text(node: &Handle) -> String {
    dom::text_content_with(node, &|n| !is_chrome(n))
}

/// Collapse every whitespace run to a single space, keeping edge spaces so
/// adjacent inline fragments still join correctly.
pub(crate) fn collapse_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_ws = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !in_ws {
                out.push(' ');
            }
            in_ws = true;
        } else {
            out.push(c);
            in_ws = false;
        }
    }
    out
}

/// Prefer the conventionally-marked prose body inside a message node.
fn narrow_payload(node: &Handle) -> Handle {
    dom::find_first(node, &|n| {
        dom::has_class(n, "markdown") || dom::has_class(n, "prose")
    })
    .unwrap_or_else(|| node.clone())
}

/// Convert one message node into its block tree.
///
/// Returns an empty vec when the node holds nothing worth keeping (the
/// assembler treats that as noise and skips the message).
pub fn convert_message(
    node: &Handle,
    _opts: &ConversionOptions,
) -> Result<Vec<Block>, ExportError> {
    if !dom::is_element(node) {
        return Err(ExportError::Parse(
            "message node is not an element".to_string(),
        ));
    }
    let payload = narrow_payload(node);
    let mut builder = BlockBuilder::default();
    builder.visit_children(&payload);
    Ok(builder.finish())
}

#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<Block>,
    inline_run: Vec<Inline>,
}

impl BlockBuilder {
    fn visit_children(&mut self, node: &Handle) {
        let parent_tag = dom::tag_name(node).unwrap_or_default();
        for child in dom::children(node) {
            self.visit(&child, &parent_tag);
        }
    }

    fn visit(&mut self, node: &Handle, parent_tag: &str) {
        match &node.data {
            NodeData::Text { contents } => self.push_text(&contents.borrow()),
            NodeData::Element { .. } => self.visit_element(node, parent_tag),
            _ => {}
        }
    }

    fn visit_element(&mut self, node: &Handle, parent_tag: &str) {
        if is_chrome(node) {
            return;
        }

        // class-marked widgets take precedence over the tag
        if inline::is_math_widget(node) {
            self.visit_math(node, parent_tag);
            return;
        }

        let tag = match dom::tag_name(node) {
            Some(tag) => tag,
            None => return,
        };
        match tag.as_str() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.flush_paragraph();
                let level = tag.as_bytes()[1] - b'0';
                let text = collapse_ws(&visible_text(node)).trim().to_string();
                if !text.is_empty() {
                    self.blocks.push(Block::Heading { level, text });
                }
            }
            "pre" => {
                self.flush_paragraph();
                self.blocks.push(convert_code_block(node));
            }
            "ul" | "ol" => {
                self.flush_paragraph();
                let items: Vec<String> = dom::children(node)
                    .iter()
                    .filter(|child| dom::tag_name(child).as_deref() == Some("li"))
                    .map(|li| collapse_ws(&visible_text(li)).trim().to_string())
                    .filter(|item| !item.is_empty())
                    .collect();
                if !items.is_empty() {
                    self.blocks.push(Block::List {
                        ordered: tag == "ol",
                        items,
                    });
                }
            }
            "blockquote" => {
                self.flush_paragraph();
                let text = normalize(&visible_text(node));
                if !text.is_empty() {
                    self.blocks.push(Block::Blockquote(text));
                }
            }
            "p" | "div" | "section" | "article" | "figure" | "main" => {
                self.flush_paragraph();
                self.visit_children(node);
                self.flush_paragraph();
            }
            "code" => self.inline_run.push(inline::inline_code(node)),
            "a" => self.inline_run.push(inline::link(node)),
            "img" => self.inline_run.push(inline::image(node)),
            "br" => self.inline_run.push(Inline::Text("\n".to_string())),
            // spans, emphasis, custom elements: transparent inline containers
            _ => {
                for child in dom::children(node) {
                    self.visit(&child, &tag);
                }
            }
        }
    }

    fn visit_math(&mut self, node: &Handle, parent_tag: &str) {
        match inline::math_source(node) {
            Some(source) => {
                let display = dom::has_class(node, "katex-display")
                    || BLOCK_CONTAINERS.contains(&parent_tag);
                if display {
                    self.flush_paragraph();
                    self.blocks.push(Block::MathBlock(source));
                } else {
                    self.inline_run.push(Inline::Math(source));
                }
            }
            // no recoverable source: keep the rendered glyphs as plain text
            None => self.push_text(&inline::rendered_math_text(node)),
        }
    }

    fn push_text(&mut self, raw: &str) {
        if raw.is_empty() {
            return;
        }
        let collapsed = collapse_ws(raw);
        if collapsed.trim().is_empty() {
            // pure whitespace only joins existing inline content
            let joins = matches!(self.inline_run.last(), Some(Inline::Text(t)) if t.ends_with(' '));
            if !self.inline_run.is_empty() && !joins {
                self.inline_run.push(Inline::Text(" ".to_string()));
            }
        } else {
            self.inline_run.push(Inline::Text(collapsed));
        }
    }

    fn flush_paragraph(&mut self) {
        if self.inline_run.is_empty() {
            return;
        }
        let inlines = std::mem::take(&mut self.inline_run);
        let has_content = inlines.iter().any(|i| match i {
            Inline::Text(t) => !t.trim().is_empty(),
            _ => true,
        });
        if has_content {
            self.blocks.push(Block::Paragraph(inlines));
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush_paragraph();
        self.blocks
    }
}

/// `<pre>`: fence from the enclosed `<code>` (or the `<pre>` itself).
fn convert_code_block(node: &Handle) -> Block {
    let code_el = dom::find_first(node, &|n| dom::tag_name(n).as_deref() == Some("code"))
        .unwrap_or_else(|| node.clone());
    let language = dom::classes(&code_el)
        .iter()
        .find_map(|c| c.strip_prefix("language-").map(str::to_string))
        .unwrap_or_default();
    let mut code = dom::text_content(&code_el);
    code.retain(|c| c != '\r');
    if code.ends_with('\n') {
        code.pop();
    }
    Block::CodeFence { language, code }
}
