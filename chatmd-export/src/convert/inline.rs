//! Inline converters: per-node transforms that yield inline tree nodes.

use markup5ever_rcdom::Handle;

use crate::convert::collapse_ws;
use crate::dom;
use crate::ir::nodes::Inline;

/// True for a math-rendering widget (a KaTeX-style span).
pub fn is_math_widget(node: &Handle) -> bool {
    dom::has_class(node, "katex") || dom::has_class(node, "katex-display")
}

/// Embedded TeX source of a math widget, if the renderer kept one.
///
/// KaTeX mirrors the authored formula into an `<annotation
/// encoding="application/x-tex">` element under the MathML branch.
pub fn math_source(node: &Handle) -> Option<String> {
    let annotation = dom::find_first(node, &|n| {
        dom::tag_name(n).as_deref() == Some("annotation")
            && dom::attr(n, "encoding").as_deref() == Some("application/x-tex")
    })?;
    let source = dom::text_content(&annotation).trim().to_string();
    if source.is_empty() {
        None
    } else {
        Some(source)
    }
}

/// Rendered glyph text of a math widget, for the no-annotation degrade path.
///
/// The MathML branch duplicates the visible HTML branch, so it is skipped to
/// avoid doubled output.
pub fn rendered_math_text(node: &Handle) -> String {
    let text = dom::text_content_with(node, &|n| !dom::has_class(n, "katex-mathml"));
    collapse_ws(&text).trim().to_string()
}

/// `<code>` span outside a `<pre>`: literal text, delimiters added at render.
pub fn inline_code(node: &Handle) -> Inline {
    Inline::Code(dom::text_content(node))
}

/// `<a>`: visible text with the href as fallback label.
pub fn link(node: &Handle) -> Inline {
    let href = dom::attr(node, "href").unwrap_or_default();
    let mut text = collapse_ws(&crate::convert::visible_text(node))
        .trim()
        .to_string();
    if text.is_empty() {
        text = href.clone();
    }
    Inline::Link { text, href }
}

/// `<img>`: alt/src pair; collapse is a rendering decision, not ours.
pub fn image(node: &Handle) -> Inline {
    Inline::Image {
        alt: dom::attr(node, "alt").unwrap_or_default(),
        src: dom::attr(node, "src").unwrap_or_default(),
    }
}
